use color_eyre::Result;
use serde::Serialize;

use crate::services::auth::EmailSender;

#[derive(Serialize)]
struct SendEmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
}

/// Verification mail via the Resend HTTP API. Without an API key the sender
/// reports itself disabled and the app runs in dev mode (accounts are
/// created pre-verified).
#[derive(Clone)]
pub struct ResendEmailSender {
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ResendEmailSender {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

impl EmailSender for ResendEmailSender {
    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn send_verification_email(&self, to_email: &str, verification_url: &str) -> Result<()> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!("email sending disabled, skipping verification email to {to_email}");
            return Ok(());
        };

        let body = SendEmailRequest {
            from: "Ludoteca <noreply@ludoteca.app>".to_string(),
            to: vec![to_email.to_string()],
            subject: "Verify your Ludoteca account".to_string(),
            html: format!(
                r#"<h2>Welcome to Ludoteca!</h2>
<p>Click the link below to verify your email address:</p>
<p><a href="{verification_url}">{verification_url}</a></p>
<p>This link expires in 24 hours.</p>"#
            ),
        };

        let resp = self
            .client
            .post("https://api.resend.com/emails")
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("Resend API error: {status} - {text}");
            color_eyre::eyre::bail!("Resend API returned {status}");
        }

        tracing::info!("verification email sent to {to_email}");
        Ok(())
    }
}
