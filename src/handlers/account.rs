use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    extractors::{AuthGuard, IsHtmx},
    names,
    rejections::{AppError, ResultExt},
    utils, views, AppState,
};

use crate::views::account as account_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/register", get(register_page).post(register_post))
        .route("/login", get(login_page).post(login_post))
        .route("/logout", post(logout_post))
        .route("/verify-email/{token}", get(verify_email))
        .route("/resend-verification", post(resend_verification))
        .route("/account", get(account_page))
}

async fn home() -> Redirect {
    Redirect::to(names::ACTIVITIES_URL)
}

async fn login_page(IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Sign in",
        account_views::login_page(account_views::LoginState::NoError),
        None,
    )
}

async fn register_page(IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Sign up",
        account_views::register_page(account_views::RegisterState::NoError),
        None,
    )
}

/// Session cookie plus an htmx redirect to the activities list.
fn logged_in_response(state: &AppState, session_token: &str) -> Result<HeaderMap, AppError> {
    let cookie = utils::cookie(
        names::USER_SESSION_COOKIE_NAME,
        session_token,
        state.secure_cookies,
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie.parse().reject("could not build session cookie")?,
    );
    headers.insert(
        "HX-Redirect",
        HeaderValue::from_static(names::ACTIVITIES_URL),
    );
    Ok(headers)
}

#[derive(Deserialize)]
struct LoginPost {
    email: String,
    password: String,
}

async fn login_post(
    State(state): State<AppState>,
    Json(body): Json<LoginPost>,
) -> Result<axum::response::Response, AppError> {
    use crate::services::auth::LoginOutcome;

    let outcome = state
        .auth
        .login(&body.email, &body.password)
        .await
        .reject("login failed")?;

    match outcome {
        LoginOutcome::Success(session_token) => {
            Ok((logged_in_response(&state, &session_token)?, "").into_response())
        }
        LoginOutcome::InvalidCredentials => Ok(views::titled(
            "Sign in",
            account_views::login_page(account_views::LoginState::InvalidCredentials),
        )
        .into_response()),
        LoginOutcome::EmailNotVerified => Ok(views::titled(
            "Sign in",
            account_views::login_page(account_views::LoginState::EmailNotVerified(body.email)),
        )
        .into_response()),
    }
}

#[derive(Deserialize)]
struct RegisterPost {
    name: String,
    email: String,
    password: String,
}

async fn register_post(
    State(state): State<AppState>,
    Json(body): Json<RegisterPost>,
) -> Result<axum::response::Response, AppError> {
    use crate::services::auth::RegisterOutcome;

    let outcome = state
        .auth
        .register(&body.name, &body.email, &body.password)
        .await
        .reject("registration failed")?;

    let register_state = match outcome {
        RegisterOutcome::LoggedIn(session_token) => {
            return Ok((logged_in_response(&state, &session_token)?, "").into_response());
        }
        RegisterOutcome::VerificationSent(email) => {
            account_views::RegisterState::VerificationSent(email)
        }
        RegisterOutcome::VerificationEmailFailed(email) => {
            account_views::RegisterState::VerificationEmailFailed(email)
        }
        RegisterOutcome::EmptyFields => account_views::RegisterState::EmptyFields,
        RegisterOutcome::EmailTaken => account_views::RegisterState::EmailTaken,
        RegisterOutcome::WeakPassword => account_views::RegisterState::WeakPassword,
    };

    Ok(views::titled("Sign up", account_views::register_page(register_state)).into_response())
}

async fn logout_post(
    jar: CookieJar,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(session_id) = jar
        .get(names::USER_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    {
        let _ = state.auth.logout(&session_id).await;
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        utils::expire_cookie(names::USER_SESSION_COOKIE_NAME)
            .parse()
            .reject("could not build clear cookie")?,
    );
    headers.insert("HX-Redirect", HeaderValue::from_static(names::LOGIN_URL));

    Ok((headers, ""))
}

async fn verify_email(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(token): Path<String>,
) -> Result<maud::Markup, AppError> {
    let verified = state
        .auth
        .verify_email(&token)
        .await
        .reject("could not verify email token")?;

    Ok(views::render(
        is_htmx,
        if verified { "Email verified" } else { "Verification failed" },
        account_views::email_verified_page(verified),
        None,
    ))
}

#[derive(Deserialize)]
struct ResendVerificationPost {
    email: String,
}

async fn resend_verification(
    State(state): State<AppState>,
    Json(body): Json<ResendVerificationPost>,
) -> Result<axum::response::Response, AppError> {
    if !state.auth.email_enabled() {
        return Err(AppError::Input("email verification not configured"));
    }

    state
        .auth
        .resend_verification(&body.email)
        .await
        .reject("could not resend verification")?;

    // always the same answer, whether or not the email exists
    Ok(views::titled(
        "Verification email sent",
        account_views::verification_resent_page(&body.email),
    )
    .into_response())
}

async fn account_page(AuthGuard(user): AuthGuard, IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Account",
        account_views::account_page(&user),
        Some(&user.name),
    )
}
