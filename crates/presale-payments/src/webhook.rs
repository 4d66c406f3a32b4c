//! Stripe Webhook Handling
//!
//! Records presale purchases when a hosted checkout completes. Verification
//! is mandatory: without a signing secret every webhook is refused.

use std::sync::Arc;

use presale_core::{
    mail::{self, Mailer},
    records::{NewPresalePurchase, PaymentStatus, PresalePurchase, PurchaseStore},
    TierCatalog,
};
use stripe::{Event, EventObject, EventType, Webhook, WebhookError};

use crate::error::{PaymentError, Result};

/// Parsed webhook event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookEvent {
    /// Checkout completed - record purchase and confirm by email
    CheckoutCompleted {
        session_id: String,
        payment_intent: Option<String>,
        amount_total: i64,
        tier: String,
        name: String,
        email: String,
    },

    /// Unhandled event type
    Other { event_type: String },
}

/// What processing an event did
#[derive(Clone, Debug)]
pub enum WebhookOutcome {
    PurchaseRecorded {
        purchase: PresalePurchase,
        email_sent: bool,
    },
    Ignored {
        event_type: String,
    },
}

/// Webhook handler
pub struct WebhookHandler {
    purchases: Arc<dyn PurchaseStore>,
    mailer: Arc<dyn Mailer>,
    catalog: Arc<TierCatalog>,
    mail_from: String,
}

impl WebhookHandler {
    pub fn new(
        purchases: Arc<dyn PurchaseStore>,
        mailer: Arc<dyn Mailer>,
        catalog: Arc<TierCatalog>,
        mail_from: impl Into<String>,
    ) -> Self {
        Self {
            purchases,
            mailer,
            catalog,
            mail_from: mail_from.into(),
        }
    }

    /// Verify the signature and parse the event.
    ///
    /// Fails closed: a missing header or a missing secret is an error.
    /// Signed timestamps more than five minutes from `now` are refused.
    pub fn verify_and_parse(
        &self,
        payload: &str,
        header: Option<&str>,
        secret: Option<&str>,
        now: i64,
    ) -> Result<Event> {
        let header = header.ok_or(PaymentError::MissingSignature)?;
        let secret = secret
            .filter(|s| !s.is_empty())
            .ok_or(PaymentError::WebhookSecretMissing)?;

        Webhook::construct_event_with_timestamp(payload, header, secret, now).map_err(|e| match e {
            WebhookError::BadParse(e) => PaymentError::WebhookParse(e.to_string()),
            other => PaymentError::WebhookSignature(other.to_string()),
        })
    }

    /// Process a verified event
    pub async fn handle(&self, event: Event) -> Result<WebhookOutcome> {
        tracing::info!(event_id = %event.id, event_type = %event.type_, "Webhook event received");

        match parse_webhook_event(&event)? {
            WebhookEvent::CheckoutCompleted {
                session_id,
                payment_intent,
                amount_total,
                tier,
                name,
                email,
            } => {
                tracing::info!(tier = %tier, email = %email, session_id = %session_id, "Processing completed checkout");

                let purchase = self
                    .purchases
                    .insert_purchase(NewPresalePurchase {
                        email: email.clone(),
                        name: name.clone(),
                        tier: tier.clone(),
                        stripe_session_id: session_id,
                        stripe_payment_intent: payment_intent,
                        amount_paid: amount_total,
                        payment_status: PaymentStatus::Completed,
                    })
                    .await?;

                tracing::info!(purchase_id = %purchase.id, "Purchase saved");

                let content = mail::purchase_confirmation(&name, &tier, self.catalog.get(&tier));
                let email_sent = match self.mailer.send(content.addressed(&self.mail_from, &email)).await {
                    Ok(id) => {
                        tracing::info!(message_id = %id, "Welcome email sent");
                        true
                    }
                    Err(e) => {
                        // purchase stays recorded and the event is still acknowledged
                        tracing::error!(error = %e, email = %email, "Failed to send welcome email");
                        false
                    }
                };

                Ok(WebhookOutcome::PurchaseRecorded {
                    purchase,
                    email_sent,
                })
            }

            WebhookEvent::Other { event_type } => {
                tracing::debug!(event_type = %event_type, "Unhandled webhook event");
                Ok(WebhookOutcome::Ignored { event_type })
            }
        }
    }
}

/// Parse Stripe event into our event type
pub fn parse_webhook_event(event: &Event) -> Result<WebhookEvent> {
    if event.type_ != EventType::CheckoutSessionCompleted {
        return Ok(WebhookEvent::Other {
            event_type: event.type_.to_string(),
        });
    }

    let EventObject::CheckoutSession(session) = &event.data.object else {
        return Err(PaymentError::WebhookParse("Invalid checkout session data".into()));
    };
    let session_id = session.id.to_string();

    let field = |key: &str| {
        session
            .metadata
            .as_ref()
            .and_then(|m| m.get(key))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let (Some(tier), Some(name), Some(email)) = (field("tier"), field("name"), field("email")) else {
        tracing::error!(session_id = %session_id, "Missing metadata in session");
        return Err(PaymentError::MissingMetadata(session_id));
    };

    Ok(WebhookEvent::CheckoutCompleted {
        session_id,
        payment_intent: session.payment_intent.as_ref().map(|p| p.id().to_string()),
        amount_total: session.amount_total.unwrap_or(0),
        tier,
        name,
        email,
    })
}
