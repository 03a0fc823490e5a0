use color_eyre::Result;

use crate::db::models::AuthUser;
use crate::db::Db;
use crate::email::ResendEmailSender;
use crate::names;

// ---------------------------------------------------------------------------
// AuthRepository trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait AuthRepository: Send + Sync {
    fn email_exists(&self, email: &str) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn create_unverified_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<(i32, String)>> + Send;

    fn create_user_session(
        &self,
        user_id: i32,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn verify_user_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn is_email_verified(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<AuthUser>>> + Send;

    fn delete_user_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn verify_email_token(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn regenerate_verification_token(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
}

impl AuthRepository for Db {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        Db::email_exists(self, email).await
    }

    async fn create_unverified_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(i32, String)> {
        Db::create_unverified_user(self, name, email, password).await
    }

    async fn create_user_session(&self, user_id: i32) -> Result<String> {
        Db::create_user_session(self, user_id).await
    }

    async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        Db::verify_user_password(self, email, password).await
    }

    async fn is_email_verified(&self, email: &str) -> Result<bool> {
        Db::is_email_verified(self, email).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>> {
        Db::find_user_by_email(self, email).await
    }

    async fn delete_user_session(&self, session_id: &str) -> Result<()> {
        Db::delete_user_session(self, session_id).await
    }

    async fn verify_email_token(&self, token: &str) -> Result<bool> {
        Db::verify_email_token(self, token).await
    }

    async fn regenerate_verification_token(&self, email: &str) -> Result<Option<String>> {
        Db::regenerate_verification_token(self, email).await
    }
}

// ---------------------------------------------------------------------------
// EmailSender trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait EmailSender: Send + Sync {
    /// Whether email sending is configured (false in dev mode).
    fn is_enabled(&self) -> bool;

    fn send_verification_email(
        &self,
        to_email: &str,
        verification_url: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

// ---------------------------------------------------------------------------
// Outcome enums
// ---------------------------------------------------------------------------

pub enum RegisterOutcome {
    /// User created and session started (dev mode, no email verification).
    LoggedIn(String),
    /// Unverified user created, verification email sent (prod mode).
    VerificationSent(String),
    /// Unverified user created, but the verification email failed.
    VerificationEmailFailed(String),
    /// Required fields were empty.
    EmptyFields,
    /// Email already in use.
    EmailTaken,
    /// Password does not meet minimum requirements.
    WeakPassword,
}

pub enum LoginOutcome {
    /// Login succeeded. Contains the session token.
    Success(String),
    /// Password was incorrect (or email not found).
    InvalidCredentials,
    /// Credentials correct but email not yet verified.
    EmailNotVerified,
}

const MIN_PASSWORD_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

pub struct AuthService<R: AuthRepository = Db, E: EmailSender = ResendEmailSender> {
    repo: R,
    email: E,
    base_url: String,
}

impl<R: AuthRepository + Clone, E: EmailSender + Clone> Clone for AuthService<R, E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            email: self.email.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl<R: AuthRepository, E: EmailSender> AuthService<R, E> {
    pub fn new(repo: R, email: E, base_url: String) -> Self {
        Self {
            repo,
            email,
            base_url,
        }
    }

    /// Whether email verification is enabled (production mode).
    pub fn email_enabled(&self) -> bool {
        self.email.is_enabled()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let verified = self.repo.verify_user_password(email, password).await?;

        if !verified {
            return Ok(LoginOutcome::InvalidCredentials);
        }

        if self.email_enabled() {
            let email_verified = self.repo.is_email_verified(email).await?;
            if !email_verified {
                return Ok(LoginOutcome::EmailNotVerified);
            }
        }

        let user =
            self.repo.find_user_by_email(email).await?.ok_or_else(|| {
                color_eyre::eyre::eyre!("user not found after password verification")
            })?;

        let session_token = self.repo.create_user_session(user.id).await?;

        Ok(LoginOutcome::Success(session_token))
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterOutcome> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Ok(RegisterOutcome::EmptyFields);
        }

        if password.len() < MIN_PASSWORD_LENGTH {
            return Ok(RegisterOutcome::WeakPassword);
        }

        let exists = self.repo.email_exists(email).await?;
        if exists {
            return Ok(RegisterOutcome::EmailTaken);
        }

        let (user_id, token) = self
            .repo
            .create_unverified_user(name, email, password)
            .await?;

        if !self.email_enabled() {
            // Dev mode: skip verification and start a session immediately
            let session_token = self.repo.create_user_session(user_id).await?;
            return Ok(RegisterOutcome::LoggedIn(session_token));
        }

        let verification_url = format!("{}{}", self.base_url, names::verify_email_url(&token));

        if let Err(e) = self
            .email
            .send_verification_email(email, &verification_url)
            .await
        {
            tracing::error!("failed to send verification email to {email}: {e}");
            return Ok(RegisterOutcome::VerificationEmailFailed(email.to_string()));
        }

        Ok(RegisterOutcome::VerificationSent(email.to_string()))
    }

    pub async fn logout(&self, session_id: &str) -> Result<()> {
        self.repo.delete_user_session(session_id).await
    }

    pub async fn verify_email(&self, token: &str) -> Result<bool> {
        self.repo.verify_email_token(token).await
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        let token = self.repo.regenerate_verification_token(email).await?;

        if let Some(token) = token {
            let verification_url = format!("{}{}", self.base_url, names::verify_email_url(&token));
            self.email
                .send_verification_email(email, &verification_url)
                .await?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(mock_repo: MockAuthRepository) -> AuthService<MockAuthRepository, MockEmailSender> {
        let mut mock_email = MockEmailSender::new();
        mock_email.expect_is_enabled().returning(|| false);
        AuthService::new(mock_repo, mock_email, "http://localhost".to_string())
    }

    fn service_with_email(
        mock_repo: MockAuthRepository,
        mock_email: MockEmailSender,
    ) -> AuthService<MockAuthRepository, MockEmailSender> {
        AuthService::new(mock_repo, mock_email, "http://localhost".to_string())
    }

    fn mock_email_ok() -> MockEmailSender {
        let mut mock = MockEmailSender::new();
        mock.expect_is_enabled().returning(|| true);
        mock.expect_send_verification_email()
            .returning(|_, _| Box::pin(async { Ok(()) }));
        mock
    }

    fn mock_email_fail() -> MockEmailSender {
        let mut mock = MockEmailSender::new();
        mock.expect_is_enabled().returning(|| true);
        mock.expect_send_verification_email()
            .returning(|_, _| Box::pin(async { Err(color_eyre::eyre::eyre!("send failed")) }));
        mock
    }

    // ----- login tests -----

    #[tokio::test]
    async fn login_success_returns_session_token() {
        let mut mock = MockAuthRepository::new();
        mock.expect_verify_user_password()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        mock.expect_find_user_by_email().returning(|_| {
            Box::pin(async {
                Ok(Some(AuthUser {
                    id: 1,
                    email: "test@example.com".to_string(),
                    name: "Test".to_string(),
                }))
            })
        });
        mock.expect_create_user_session()
            .returning(|_| Box::pin(async { Ok("session-token-123".to_string()) }));

        let svc = service(mock);
        let outcome = svc.login("test@example.com", "password").await.unwrap();

        assert!(matches!(outcome, LoginOutcome::Success(ref t) if t == "session-token-123"));
    }

    #[tokio::test]
    async fn login_wrong_password_returns_invalid_credentials() {
        let mut mock = MockAuthRepository::new();
        mock.expect_verify_user_password()
            .returning(|_, _| Box::pin(async { Ok(false) }));

        let svc = service(mock);
        let outcome = svc.login("test@example.com", "wrong").await.unwrap();

        assert!(matches!(outcome, LoginOutcome::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_unverified_email_returns_email_not_verified() {
        let mut mock = MockAuthRepository::new();
        mock.expect_verify_user_password()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        mock.expect_is_email_verified()
            .returning(|_| Box::pin(async { Ok(false) }));

        // email_enabled=true
        let svc = service_with_email(mock, mock_email_ok());
        let outcome = svc.login("test@example.com", "password").await.unwrap();

        assert!(matches!(outcome, LoginOutcome::EmailNotVerified));
    }

    // ----- register tests -----

    #[tokio::test]
    async fn register_empty_fields_returns_empty_fields() {
        let mock = MockAuthRepository::new();
        let svc = service(mock);

        let outcome = svc.register("", "a@b.com", "password123").await.unwrap();
        assert!(matches!(outcome, RegisterOutcome::EmptyFields));

        let mock = MockAuthRepository::new();
        let svc = service(mock);
        let outcome = svc.register("name", "", "password123").await.unwrap();
        assert!(matches!(outcome, RegisterOutcome::EmptyFields));

        let mock = MockAuthRepository::new();
        let svc = service(mock);
        let outcome = svc.register("name", "a@b.com", "").await.unwrap();
        assert!(matches!(outcome, RegisterOutcome::EmptyFields));
    }

    #[tokio::test]
    async fn register_short_password_returns_weak_password() {
        let mock = MockAuthRepository::new();
        let svc = service(mock);
        let outcome = svc.register("name", "a@b.com", "short").await.unwrap();
        assert!(matches!(outcome, RegisterOutcome::WeakPassword));
    }

    #[tokio::test]
    async fn register_email_taken_returns_email_taken() {
        let mut mock = MockAuthRepository::new();
        mock.expect_email_exists()
            .returning(|_| Box::pin(async { Ok(true) }));

        let svc = service(mock);
        let outcome = svc
            .register("name", "taken@example.com", "password123")
            .await
            .unwrap();

        assert!(matches!(outcome, RegisterOutcome::EmailTaken));
    }

    #[tokio::test]
    async fn register_dev_mode_returns_logged_in() {
        let mut mock = MockAuthRepository::new();
        mock.expect_email_exists()
            .returning(|_| Box::pin(async { Ok(false) }));
        mock.expect_create_unverified_user()
            .returning(|_, _, _| Box::pin(async { Ok((1, "token-xyz".to_string())) }));
        mock.expect_create_user_session()
            .returning(|_| Box::pin(async { Ok("session-abc".to_string()) }));

        // service() has email disabled → dev mode
        let svc = service(mock);
        let outcome = svc
            .register("Name", "new@example.com", "password123")
            .await
            .unwrap();

        assert!(matches!(outcome, RegisterOutcome::LoggedIn(ref t) if t == "session-abc"));
    }

    #[tokio::test]
    async fn register_prod_mode_returns_verification_sent() {
        let mut mock = MockAuthRepository::new();
        mock.expect_email_exists()
            .returning(|_| Box::pin(async { Ok(false) }));
        mock.expect_create_unverified_user()
            .returning(|_, _, _| Box::pin(async { Ok((1, "token-xyz".to_string())) }));

        let svc = service_with_email(mock, mock_email_ok());
        let outcome = svc
            .register("Name", "new@example.com", "password123")
            .await
            .unwrap();

        assert!(
            matches!(outcome, RegisterOutcome::VerificationSent(ref e) if e == "new@example.com")
        );
    }

    #[tokio::test]
    async fn register_prod_mode_email_failure_returns_verification_email_failed() {
        let mut mock = MockAuthRepository::new();
        mock.expect_email_exists()
            .returning(|_| Box::pin(async { Ok(false) }));
        mock.expect_create_unverified_user()
            .returning(|_, _, _| Box::pin(async { Ok((1, "token-xyz".to_string())) }));

        let svc = service_with_email(mock, mock_email_fail());
        let outcome = svc
            .register("Name", "new@example.com", "password123")
            .await
            .unwrap();

        assert!(
            matches!(outcome, RegisterOutcome::VerificationEmailFailed(ref e) if e == "new@example.com")
        );
    }

    // ----- logout tests -----

    #[tokio::test]
    async fn logout_deletes_session() {
        let mut mock = MockAuthRepository::new();
        mock.expect_delete_user_session()
            .withf(|id| id == "session-123")
            .returning(|_| Box::pin(async { Ok(()) }));

        let svc = service(mock);
        svc.logout("session-123").await.unwrap();
    }

    // ----- verify_email tests -----

    #[tokio::test]
    async fn verify_email_valid_token_returns_true() {
        let mut mock = MockAuthRepository::new();
        mock.expect_verify_email_token()
            .returning(|_| Box::pin(async { Ok(true) }));

        let svc = service(mock);
        assert!(svc.verify_email("valid-token").await.unwrap());
    }

    #[tokio::test]
    async fn verify_email_invalid_token_returns_false() {
        let mut mock = MockAuthRepository::new();
        mock.expect_verify_email_token()
            .returning(|_| Box::pin(async { Ok(false) }));

        let svc = service(mock);
        assert!(!svc.verify_email("expired-token").await.unwrap());
    }

    // ----- resend_verification tests -----

    #[tokio::test]
    async fn resend_verification_calls_regenerate_token() {
        let mut mock = MockAuthRepository::new();
        mock.expect_regenerate_verification_token()
            .returning(|_| Box::pin(async { Ok(None) }));

        let svc = service(mock);
        svc.resend_verification("test@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn resend_verification_sends_email_on_token() {
        let mut mock = MockAuthRepository::new();
        mock.expect_regenerate_verification_token()
            .returning(|_| Box::pin(async { Ok(Some("new-token".to_string())) }));

        let svc = service_with_email(mock, mock_email_ok());
        svc.resend_verification("test@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn resend_verification_email_failure_returns_error() {
        let mut mock = MockAuthRepository::new();
        mock.expect_regenerate_verification_token()
            .returning(|_| Box::pin(async { Ok(Some("new-token".to_string())) }));

        let svc = service_with_email(mock, mock_email_fail());
        let result = svc.resend_verification("test@example.com").await;
        assert!(result.is_err());
    }
}
