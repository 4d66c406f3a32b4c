//! Error Types

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias for presale operations
pub type Result<T> = std::result::Result<T, PresaleError>;

/// Presale error types
#[derive(Error, Debug)]
pub enum PresaleError {
    /// Upstream chat gateway answered 429
    #[error("Rate limited by upstream provider")]
    RateLimited,

    /// Upstream chat gateway answered 402
    #[error("Upstream provider requires payment")]
    PaymentRequired,

    /// Upstream provider returned an error response
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unreachable (connect/timeout/decode)
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Tier id not present in the catalog
    #[error("Invalid tier: {0}")]
    InvalidTier(String),

    /// Signup form failed validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Name or email missing when a tier was chosen
    #[error("Please fill in your name and email first")]
    IncompleteForm,

    /// Persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Transactional email failure
    #[error("Mail error: {0}")]
    Mail(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PresaleError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::RateLimited => "Rate limits exceeded, please try again later.".into(),
            Self::PaymentRequired => "Service temporarily unavailable.".into(),
            Self::Provider(_) | Self::ProviderUnavailable(_) => "AI service error".into(),
            Self::InvalidTier(tier) => format!("Invalid tier: {tier}"),
            Self::Validation(err) => err.message.clone(),
            Self::IncompleteForm => self.to_string(),
            Self::Storage(_) => "Failed to save your request. Please try again.".into(),
            Self::Mail(_) => "Failed to send confirmation email.".into(),
            Self::Config(_) | Self::Json(_) => "An unexpected error occurred.".into(),
        }
    }
}
