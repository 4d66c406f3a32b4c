//! Persisted records
//!
//! Both record kinds are insert-only. Uniqueness, indexing and consistency
//! belong to the backing store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Waitlist row to insert
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWaitlistSignup {
    pub name: String,
    pub email: String,
    pub tier: String,
}

/// Stored waitlist row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistSignup {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub tier: String,
    pub created_at: DateTime<Utc>,
}

/// Payment state recorded with a purchase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purchase row to insert
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPresalePurchase {
    pub email: String,
    pub name: String,
    pub tier: String,
    pub stripe_session_id: String,
    pub stripe_payment_intent: Option<String>,
    /// Amount in cents
    pub amount_paid: i64,
    pub payment_status: PaymentStatus,
}

/// Stored purchase row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresalePurchase {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub tier: String,
    pub stripe_session_id: String,
    pub stripe_payment_intent: Option<String>,
    pub amount_paid: i64,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

/// Waitlist persistence
#[async_trait]
pub trait SignupStore: Send + Sync {
    /// Insert one row and return it as stored
    async fn insert_signup(&self, signup: NewWaitlistSignup) -> Result<WaitlistSignup>;
}

/// Purchase persistence
#[async_trait]
pub trait PurchaseStore: Send + Sync {
    /// Insert one row and return it as stored
    async fn insert_purchase(&self, purchase: NewPresalePurchase) -> Result<PresalePurchase>;
}
