//! # presale-runtime
//!
//! Concrete integrations behind the `presale-core` traits.
//!
//! ## Providers
//!
//! - **gateway**: OpenAI-compatible chat-completion gateway (`LlmProvider`)
//! - **resend**: Resend transactional email (`Mailer`), plus a log-only mailer
//! - **postgres**: `sqlx` store for waitlist signups and purchases
//! - **memory**: in-process store for development and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use presale_runtime::{GatewayConfig, GatewayProvider};
//!
//! let config = GatewayConfig {
//!     api_key,
//!     ..Default::default()
//! };
//! let provider = GatewayProvider::new(config)?;
//! let completion = provider.complete(&messages, &options).await?;
//! ```

pub mod gateway;
pub mod memory;
pub mod postgres;
pub mod resend;

pub use gateway::{GatewayConfig, GatewayProvider};
pub use memory::MemoryStore;
pub use postgres::{PostgresConfig, PostgresStore};
pub use resend::{LogMailer, ResendMailer};

// Re-export core types for convenience
pub use presale_core::{LlmProvider, Mailer, PresaleError, PurchaseStore, Result, SignupStore};
