//! Payment Error Types

use presale_core::PresaleError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Tier id not in the price table; no session was created
    #[error("Invalid tier: {0}")]
    InvalidTier(String),

    /// Request carried no `Stripe-Signature` header
    #[error("No signature")]
    MissingSignature,

    /// No signing secret configured; webhooks are refused
    #[error("Webhook signing secret not configured")]
    WebhookSecretMissing,

    /// Webhook signature verification failed
    #[error("Webhook signature invalid: {0}")]
    WebhookSignature(String),

    /// Webhook payload parsing failed
    #[error("Webhook parse error: {0}")]
    WebhookParse(String),

    /// Completed session lacks tier/name/email metadata
    #[error("Missing metadata in session {0}")]
    MissingMetadata(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            PaymentError::Stripe(_) => "Payment processing failed. Please try again.".into(),
            PaymentError::InvalidTier(tier) => format!("Invalid tier: {tier}"),
            PaymentError::MissingSignature => "No signature".into(),
            PaymentError::MissingMetadata(_) => "Missing metadata".into(),
            PaymentError::WebhookSecretMissing
            | PaymentError::WebhookSignature(_)
            | PaymentError::WebhookParse(_) => "Invalid webhook".into(),
            PaymentError::Config(_) => "Service configuration error.".into(),
            PaymentError::Storage(_) => "An error occurred processing your request.".into(),
        }
    }
}

impl From<PresaleError> for PaymentError {
    fn from(err: PresaleError) -> Self {
        match err {
            PresaleError::InvalidTier(tier) => PaymentError::InvalidTier(tier),
            PresaleError::Storage(msg) => PaymentError::Storage(msg),
            PresaleError::Config(msg) => PaymentError::Config(msg),
            other => PaymentError::Storage(other.to_string()),
        }
    }
}
