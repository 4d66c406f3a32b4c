//! In-memory record store (for development)

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use presale_core::{
    error::{PresaleError, Result},
    records::{
        NewPresalePurchase, NewWaitlistSignup, PresalePurchase, PurchaseStore, SignupStore,
        WaitlistSignup,
    },
};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    signups: RwLock<Vec<WaitlistSignup>>,
    purchases: RwLock<Vec<PresalePurchase>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored signups, in insertion order
    pub fn signups(&self) -> Vec<WaitlistSignup> {
        self.signups.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Snapshot of stored purchases, in insertion order
    pub fn purchases(&self) -> Vec<PresalePurchase> {
        self.purchases.read().map(|p| p.clone()).unwrap_or_default()
    }
}

fn poisoned<T>(_: T) -> PresaleError {
    PresaleError::Storage("memory store lock poisoned".into())
}

#[async_trait]
impl SignupStore for MemoryStore {
    async fn insert_signup(&self, signup: NewWaitlistSignup) -> Result<WaitlistSignup> {
        let row = WaitlistSignup {
            id: Uuid::new_v4(),
            name: signup.name,
            email: signup.email,
            tier: signup.tier,
            created_at: Utc::now(),
        };

        self.signups.write().map_err(poisoned)?.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl PurchaseStore for MemoryStore {
    async fn insert_purchase(&self, purchase: NewPresalePurchase) -> Result<PresalePurchase> {
        let row = PresalePurchase {
            id: Uuid::new_v4(),
            email: purchase.email,
            name: purchase.name,
            tier: purchase.tier,
            stripe_session_id: purchase.stripe_session_id,
            stripe_payment_intent: purchase.stripe_payment_intent,
            amount_paid: purchase.amount_paid,
            payment_status: purchase.payment_status.to_string(),
            created_at: Utc::now(),
        };

        self.purchases.write().map_err(poisoned)?.push(row.clone());
        Ok(row)
    }
}
