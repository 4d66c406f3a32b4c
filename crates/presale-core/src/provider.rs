//! LLM Provider Strategy Pattern
//!
//! Common interface for chat-completion backends. The chat endpoint works
//! exclusively through this trait, so tests and local development can swap
//! the hosted gateway for a fake.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use presale_core::provider::{GenerationOptions, LlmProvider};
//!
//! let completion = provider.complete(&messages, &GenerationOptions::default()).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::{ChatCompletion, Message};

/// Model used when nothing else is configured
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier understood by the gateway
    pub model: String,

    /// Sampling temperature; gateway default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate; gateway default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Strategy trait for chat-completion providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (for logs and `/health`)
    fn name(&self) -> &str;

    /// Check if the provider is configured and reachable
    async fn health_check(&self) -> Result<bool>;

    /// Send the whole transcript and return the completion.
    ///
    /// Exactly one upstream call per invocation; no retries.
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<ChatCompletion>;
}
