//! AI Gateway LLM Provider
//!
//! Implementation of `LlmProvider` for a hosted, OpenAI-compatible
//! chat-completions endpoint.

use async_trait::async_trait;
use presale_core::{
    error::{PresaleError, Result},
    message::{ChatCompletion, Message},
    provider::{GenerationOptions, LlmProvider, DEFAULT_MODEL},
};
use reqwest::StatusCode;
use serde::Serialize;

/// Gateway configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Full chat-completions URL
    pub url: String,

    /// Bearer token
    pub api_key: String,

    /// Model sent with every request
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: "https://ai.gateway.lovable.dev/v1/chat/completions".into(),
            api_key: String::new(),
            model: DEFAULT_MODEL.into(),
            timeout_secs: 120,
        }
    }
}

impl GatewayConfig {
    /// Options the chat handler should use with this gateway
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.model.clone(),
            ..Default::default()
        }
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Hosted chat-completion gateway
pub struct GatewayProvider {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl GatewayProvider {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PresaleError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Map a non-success gateway status to the error taxonomy
pub fn status_error(status: StatusCode, body: &str) -> PresaleError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => PresaleError::RateLimited,
        StatusCode::PAYMENT_REQUIRED => PresaleError::PaymentRequired,
        other => PresaleError::Provider(format!("gateway returned {other}: {body}")),
    }
}

#[async_trait]
impl LlmProvider for GatewayProvider {
    fn name(&self) -> &str {
        "ai-gateway"
    }

    async fn health_check(&self) -> Result<bool> {
        // no health endpoint upstream
        Ok(!self.config.api_key.is_empty())
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<ChatCompletion> {
        let body = CompletionBody {
            model: &options.model,
            messages,
            stream: false,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        tracing::debug!(model = %options.model, messages = messages.len(), "Sending chat completion");

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PresaleError::ProviderUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if status != StatusCode::TOO_MANY_REQUESTS && status != StatusCode::PAYMENT_REQUIRED {
                tracing::error!(status = %status, body = %text, "AI gateway error");
            }
            return Err(status_error(status, &text));
        }

        response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| PresaleError::Provider(format!("invalid completion body: {e}")))
    }
}
