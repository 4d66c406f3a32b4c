//! # presale-core
//!
//! Domain types and pure logic for the legal-presale site: the tier catalog,
//! signup validation, the countdown, tier selection and the chat transcript.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        presale-core                          │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────────┐  │
//! │  │ TierCatalog │  │ Validation  │  │ LlmProvider / Mailer │  │
//! │  │  (config)   │──│ & Selection │  │ / Stores (traits)    │  │
//! │  └─────────────┘  └─────────────┘  └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here compiles for `wasm32` so the web frontend and the server
//! share one catalog and one validation schema. Concrete integrations live
//! in `presale-runtime` and `presale-payments`.

pub mod countdown;
pub mod error;
pub mod mail;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod records;
pub mod selection;
pub mod tier;
pub mod transcript;
pub mod validation;

pub use countdown::Countdown;
pub use error::{PresaleError, Result};
pub use mail::{Mailer, OutgoingEmail};
pub use message::{ChatCompletion, ChatRequest, Message, Role};
pub use provider::{GenerationOptions, LlmProvider};
pub use records::{
    NewPresalePurchase, NewWaitlistSignup, PaymentStatus, PresalePurchase, PurchaseStore,
    SignupStore, WaitlistSignup,
};
pub use selection::{CheckoutRequest, CheckoutResponse, SelectionAction, TierSelection, WaitlistRequest};
pub use tier::{Billing, Tier, TierCatalog, TierId};
pub use transcript::ChatTranscript;
pub use validation::{SignupForm, ValidSignup, ValidationError};
