//! PostgreSQL implementation of the record stores.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use presale_core::{
    error::{PresaleError, Result},
    records::{
        NewPresalePurchase, NewWaitlistSignup, PresalePurchase, PurchaseStore, SignupStore,
        WaitlistSignup,
    },
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

/// Connection settings
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    /// Apply the embedded migrations on connect
    pub run_migrations: bool,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            connect_timeout_secs: 5,
            run_migrations: false,
        }
    }
}

/// `sqlx::PgPool`-backed store for signups and purchases
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct SignupRow {
    id: Uuid,
    name: String,
    email: String,
    tier: String,
    created_at: DateTime<Utc>,
}

impl From<SignupRow> for WaitlistSignup {
    fn from(row: SignupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            tier: row.tier,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    id: Uuid,
    email: String,
    name: String,
    tier: String,
    stripe_session_id: String,
    stripe_payment_intent: Option<String>,
    amount_paid: i64,
    payment_status: String,
    created_at: DateTime<Utc>,
}

impl From<PurchaseRow> for PresalePurchase {
    fn from(row: PurchaseRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            tier: row.tier,
            stripe_session_id: row.stripe_session_id,
            stripe_payment_intent: row.stripe_payment_intent,
            amount_paid: row.amount_paid,
            payment_status: row.payment_status,
            created_at: row.created_at,
        }
    }
}

fn db_error(e: sqlx::Error) -> PresaleError {
    PresaleError::Storage(e.to_string())
}

impl PostgresStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and optionally run migrations
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(db_error)?;

        let store = Self::new(pool);
        if config.run_migrations {
            store.migrate().await?;
        }
        Ok(store)
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PresaleError::Storage(format!("migration failed: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SignupStore for PostgresStore {
    async fn insert_signup(&self, signup: NewWaitlistSignup) -> Result<WaitlistSignup> {
        let row = sqlx::query_as::<_, SignupRow>(
            "INSERT INTO waitlist_signups (name, email, tier) VALUES ($1, $2, $3) \
             RETURNING id, name, email, tier, created_at",
        )
        .bind(&signup.name)
        .bind(&signup.email)
        .bind(&signup.tier)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }
}

#[async_trait]
impl PurchaseStore for PostgresStore {
    async fn insert_purchase(&self, purchase: NewPresalePurchase) -> Result<PresalePurchase> {
        let row = sqlx::query_as::<_, PurchaseRow>(
            "INSERT INTO presale_purchases \
             (email, name, tier, stripe_session_id, stripe_payment_intent, amount_paid, payment_status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, email, name, tier, stripe_session_id, stripe_payment_intent, \
             amount_paid, payment_status, created_at",
        )
        .bind(&purchase.email)
        .bind(&purchase.name)
        .bind(&purchase.tier)
        .bind(&purchase.stripe_session_id)
        .bind(&purchase.stripe_payment_intent)
        .bind(purchase.amount_paid)
        .bind(purchase.payment_status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.into())
    }
}
