//! Application State

use std::sync::Arc;

use presale_core::{GenerationOptions, LlmProvider, Mailer, PurchaseStore, SignupStore, TierCatalog};
use presale_payments::{CheckoutGateway, WebhookHandler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Chat-completion provider (AI gateway, fakes in tests)
    pub provider: Arc<dyn LlmProvider>,

    /// Model and sampling options for the chat endpoint
    pub generation: GenerationOptions,

    /// Immutable tier catalog loaded at startup
    pub catalog: Arc<TierCatalog>,

    pub signups: Arc<dyn SignupStore>,

    pub purchases: Arc<dyn PurchaseStore>,

    pub mailer: Arc<dyn Mailer>,

    /// Hosted checkout (optional - None if not configured)
    pub checkout: Option<Arc<dyn CheckoutGateway>>,

    /// Stripe signing secret; webhooks are rejected while `None`
    pub webhook_secret: Option<String>,

    /// Public origin for checkout redirects
    pub site_url: String,

    /// Sender for transactional email
    pub mail_from: String,
}

impl AppState {
    pub fn webhook_handler(&self) -> WebhookHandler {
        WebhookHandler::new(
            self.purchases.clone(),
            self.mailer.clone(),
            self.catalog.clone(),
            self.mail_from.clone(),
        )
    }
}
