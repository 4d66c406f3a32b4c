//! # presale-payments
//!
//! Stripe hosted checkout for presale seats and the purchase webhook that
//! records completed payments.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │  Landing    │────▶│  Stripe Hosted  │────▶│  Landing    │
//! │  (pricing)  │     │  Checkout Page  │     │ ?success=.. │
//! └─────────────┘     └────────┬────────┘     └─────────────┘
//!                              │ checkout.session.completed
//!                              ▼
//!                     ┌─────────────────┐     ┌─────────────┐
//!                     │ WebhookHandler  │────▶│ purchase row│
//!                     │ (HMAC verified) │     │ + email     │
//!                     └─────────────────┘     └─────────────┘
//! ```
//!
//! The tier, name and email travel as session metadata and come back on the
//! completed event; the webhook trusts nothing else from the browser.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use presale_payments::{PresaleCheckout, StripeClient};
//!
//! let stripe = StripeClient::new(&secret_key);
//! let checkout = PresaleCheckout::new(&catalog, &stripe, "https://presale.example");
//! let response = checkout.create(&request).await?;
//!
//! // Redirect user to: response.url
//! ```

mod checkout;
mod error;
mod webhook;

pub use checkout::{CheckoutGateway, HostedSession, PresaleCheckout, SessionParams, StripeClient};
pub use error::{PaymentError, Result};
pub use webhook::{parse_webhook_event, WebhookEvent, WebhookHandler, WebhookOutcome};
