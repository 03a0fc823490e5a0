use maud::{html, Markup};

use crate::{db::models::AuthUser, names};

pub enum LoginState {
    NoError,
    InvalidCredentials,
    EmailNotVerified(String),
}

pub enum RegisterState {
    NoError,
    EmptyFields,
    EmailTaken,
    WeakPassword,
    VerificationSent(String),
    VerificationEmailFailed(String),
}

pub fn login_page(state: LoginState) -> Markup {
    let error = match &state {
        LoginState::NoError => None,
        LoginState::InvalidCredentials => Some("Invalid email or password"),
        LoginState::EmailNotVerified(_) => Some("Your email address is not verified yet"),
    };

    html! {
        h1 { "Sign in" }

        article style="width: fit-content;" {
            form hx-post=(names::LOGIN_URL)
                 hx-ext="json-enc"
                 hx-target="main"
                 hx-disabled-elt="find input, find button"
                 hx-swap="innerHTML" {
                label {
                    "Email"
                    @if error.is_some() {
                        input name="email" type="email" required="true" aria-invalid="true";
                    } @else {
                        input name="email" type="email" required="true";
                    }
                }
                label {
                    "Password"
                    input name="password" type="password" autocomplete="current-password" required="true";
                    @if let Some(message) = error {
                        small { (message) }
                    }
                }
                button type="submit" { "Sign in" }
            }

            @if let LoginState::EmailNotVerified(email) = &state {
                form hx-post=(names::RESEND_VERIFICATION_URL)
                     hx-ext="json-enc"
                     hx-target="main"
                     hx-swap="innerHTML" {
                    input type="hidden" name="email" value=(email);
                    button type="submit" class="secondary" { "Resend verification email" }
                }
            }

            p {
                "No account yet? "
                a href=(names::REGISTER_URL) { "Create one" }
            }
        }
    }
}

pub fn register_page(state: RegisterState) -> Markup {
    let error = match &state {
        RegisterState::NoError => None,
        RegisterState::EmptyFields => Some("All fields are required"),
        RegisterState::EmailTaken => Some("This email is already in use"),
        RegisterState::WeakPassword => Some("Password must be at least 8 characters"),
        RegisterState::VerificationSent(_) | RegisterState::VerificationEmailFailed(_) => None,
    };

    if let RegisterState::VerificationSent(email) = &state {
        return html! {
            article {
                h1 { "Check your inbox" }
                p { "We sent a verification link to " strong { (email) } "." }
                p { "The link expires in 24 hours." }
            }
        };
    }

    if let RegisterState::VerificationEmailFailed(email) = &state {
        return html! {
            article {
                h1 { "Account created" }
                p { "We could not send the verification email to " strong { (email) } "." }
                form hx-post=(names::RESEND_VERIFICATION_URL)
                     hx-ext="json-enc"
                     hx-target="main"
                     hx-swap="innerHTML" {
                    input type="hidden" name="email" value=(email);
                    button type="submit" { "Try again" }
                }
            }
        };
    }

    html! {
        h1 { "Create an account" }

        article style="width: fit-content;" {
            form hx-post=(names::REGISTER_URL)
                 hx-ext="json-enc"
                 hx-target="main"
                 hx-disabled-elt="find input, find button"
                 hx-swap="innerHTML" {
                label {
                    "Name"
                    input name="name" type="text" required="true";
                }
                label {
                    "Email"
                    input name="email" type="email" required="true";
                }
                label {
                    "Password"
                    input name="password" type="password" autocomplete="new-password" required="true";
                    @if let Some(message) = error {
                        small { (message) }
                    }
                }
                button type="submit" { "Sign up" }
            }

            p {
                "Already registered? "
                a href=(names::LOGIN_URL) { "Sign in" }
            }
        }
    }
}

pub fn account_page(user: &AuthUser) -> Markup {
    html! {
        h1 { "Account" }

        article style="width: fit-content;" {
            label {
                "Email"
                input type="email" value=(user.email) disabled="true";
            }
            label {
                "Name"
                input type="text" value=(user.name) disabled="true";
            }

            form hx-post=(names::LOGOUT_URL)
                 hx-ext="json-enc"
                 hx-target="main"
                 hx-swap="innerHTML" {
                button type="submit" class="secondary" { "Sign out" }
            }
        }
    }
}

pub fn email_verified_page(success: bool) -> Markup {
    html! {
        article {
            @if success {
                h1 { "Email verified" }
                p { "Your account is ready." }
                a href=(names::LOGIN_URL) { "Sign in" }
            } @else {
                h1 { "Verification failed" }
                p { "The link is invalid or has expired." }
            }
        }
    }
}

pub fn verification_resent_page(email: &str) -> Markup {
    html! {
        article {
            h1 { "Verification email sent" }
            p { "If " strong { (email) } " has a pending account, a new link is on its way." }
        }
    }
}
