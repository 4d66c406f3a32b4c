//! Resend email delivery

use async_trait::async_trait;
use presale_core::{
    error::{PresaleError, Result},
    mail::{Mailer, OutgoingEmail},
};
use serde::Deserialize;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

/// `Mailer` backed by the Resend HTTP API
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<String> {
        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await
            .map_err(|e| PresaleError::Mail(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PresaleError::Mail(format!("resend returned {status}: {body}")));
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| PresaleError::Mail(format!("invalid resend response: {e}")))?;

        tracing::info!(id = %sent.id, to = ?email.to, subject = %email.subject, "Email sent");
        Ok(sent.id)
    }
}

/// `Mailer` that only logs; used when no email provider is configured
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<String> {
        let id = format!("log-{}", uuid::Uuid::new_v4());
        tracing::info!(id = %id, to = ?email.to, subject = %email.subject, "Email not sent (no provider configured)");
        Ok(id)
    }
}
