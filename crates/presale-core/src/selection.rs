//! Tier selection
//!
//! Decides what happens when a visitor picks a tier: free tiers join the
//! waitlist, paid tiers start a hosted checkout. The browser executes the
//! returned action; the decision itself is pure.

use serde::{Deserialize, Serialize};

use crate::error::{PresaleError, Result};
use crate::tier::TierCatalog;
use crate::validation::SignupForm;

/// Body of the waitlist endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistRequest {
    pub name: String,
    pub email: String,
    pub tier: String,
}

/// Body of the checkout endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub tier: String,
    pub email: String,
    pub name: String,
}

/// Checkout endpoint response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

/// What the frontend should do next
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionAction {
    JoinWaitlist(WaitlistRequest),
    StartCheckout(CheckoutRequest),
}

pub struct TierSelection;

impl TierSelection {
    /// Guard on completeness, re-validate, then route by the tier's free flag
    pub fn plan(catalog: &TierCatalog, tier_id: &str, form: &SignupForm) -> Result<SelectionAction> {
        if !form.is_complete() {
            return Err(PresaleError::IncompleteForm);
        }

        let valid = form.validate()?;
        let tier = catalog.require(tier_id)?;

        let action = if tier.is_free() {
            SelectionAction::JoinWaitlist(WaitlistRequest {
                name: valid.name,
                email: valid.email,
                tier: tier.id.to_string(),
            })
        } else {
            SelectionAction::StartCheckout(CheckoutRequest {
                tier: tier.id.to_string(),
                email: valid.email,
                name: valid.name,
            })
        };

        tracing::debug!(tier = %tier.id, free = tier.is_free(), "Tier selected");
        Ok(action)
    }
}
