use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use color_eyre::{eyre::OptionExt, Result};
use libsql::params;
use ulid::Ulid;

use super::helpers::query_optional;
use super::models::AuthUser;
use super::Db;

impl Db {
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        let row = conn
            .query("SELECT 1 FROM users WHERE email = ?", params![email])
            .await?
            .next()
            .await?;
        Ok(row.is_some())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>> {
        let conn = self.db.connect()?;
        query_optional(
            &conn,
            "SELECT id, email, name FROM users WHERE email = ?",
            params![email],
        )
        .await
    }

    /// Create a new user with `email_verified = false` and a verification
    /// token valid for 24 hours. Returns (user_id, token).
    pub async fn create_unverified_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(i32, String)> {
        let password_hash = hash_password(password)?;
        let token = Ulid::new().to_string();
        let conn = self.db.connect()?;

        let user_id = conn
            .query(
                r#"INSERT INTO users (email, password_hash, name, email_verified, verification_token, token_expires_at)
                   VALUES (?, ?, ?, FALSE, ?, datetime('now', '+24 hours'))
                   RETURNING id"#,
                params![email, password_hash, name, token.clone()],
            )
            .await?
            .next()
            .await?
            .ok_or_eyre("could not get user id")?
            .get::<i32>(0)?;

        tracing::info!("new unverified user created: id={user_id}, email={email}");
        Ok((user_id, token))
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        let row = conn
            .query(
                "SELECT password_hash FROM users WHERE email = ?",
                params![email],
            )
            .await?
            .next()
            .await?;

        match row {
            Some(row) => {
                let stored_hash = row.get::<String>(0)?;
                Ok(verify_password(password, &stored_hash))
            }
            None => Ok(false),
        }
    }

    pub async fn is_email_verified(&self, email: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        let row = conn
            .query(
                "SELECT email_verified FROM users WHERE email = ?",
                params![email],
            )
            .await?
            .next()
            .await?;

        match row {
            Some(row) => Ok(row.get::<bool>(0)?),
            None => Ok(false),
        }
    }

    /// Consume a verification token. Returns false when the token is
    /// unknown, expired or already used.
    pub async fn verify_email_token(&self, token: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        let affected = conn
            .execute(
                r#"UPDATE users
                   SET email_verified = TRUE, verification_token = NULL, token_expires_at = NULL
                   WHERE verification_token = ? AND token_expires_at > datetime('now')
                   AND email_verified = FALSE"#,
                params![token],
            )
            .await?;

        Ok(affected > 0)
    }

    /// Mint a fresh verification token for an unverified account.
    pub async fn regenerate_verification_token(&self, email: &str) -> Result<Option<String>> {
        let token = Ulid::new().to_string();
        let conn = self.db.connect()?;
        let affected = conn
            .execute(
                r#"UPDATE users
                   SET verification_token = ?, token_expires_at = datetime('now', '+24 hours')
                   WHERE email = ? AND email_verified = FALSE"#,
                params![token.clone(), email],
            )
            .await?;

        if affected > 0 {
            Ok(Some(token))
        } else {
            Ok(None)
        }
    }

    pub async fn create_user_session(&self, user_id: i32) -> Result<String> {
        let session = Ulid::new().to_string();
        let conn = self.db.connect()?;

        conn.execute(
            "INSERT INTO user_sessions (id, user_id) VALUES (?, ?)",
            params![session.clone(), user_id],
        )
        .await?;

        tracing::info!("new user session created for user_id={user_id}");
        Ok(session)
    }

    pub async fn get_user_by_session(&self, session_id: &str) -> Result<Option<AuthUser>> {
        let conn = self.db.connect()?;
        query_optional(
            &conn,
            r#"
            SELECT u.id, u.email, u.name
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = ?
            "#,
            params![session_id],
        )
        .await
    }

    pub async fn delete_user_session(&self, session_id: &str) -> Result<()> {
        let conn = self.db.connect()?;
        conn.execute(
            "DELETE FROM user_sessions WHERE id = ?",
            params![session_id],
        )
        .await?;
        Ok(())
    }
}

/// Run argon2 hashing on a dedicated thread with a large stack to avoid
/// stack overflow in debug builds.
fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024) // 4 MB stack
        .spawn(move || {
            let salt = SaltString::generate(&mut OsRng);
            let argon2 = Argon2::default();
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| color_eyre::eyre::eyre!("failed to hash password: {e}"))
        })?
        .join()
        .map_err(|_| color_eyre::eyre::eyre!("hash thread panicked"))?
}

fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024)
        .spawn(move || {
            let parsed_hash = match PasswordHash::new(&hash) {
                Ok(h) => h,
                Err(_) => return false,
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .map(|h| h.join().unwrap_or(false))
        .unwrap_or(false)
}
