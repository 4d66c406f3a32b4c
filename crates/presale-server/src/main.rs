//! legal-presale HTTP Server
//!
//! Wires the configured integrations into the axum application. Anything
//! not configured falls back to a local stand-in and is reported at startup.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use presale_core::{LlmProvider, Mailer, PurchaseStore, SignupStore, TierCatalog};
use presale_payments::{CheckoutGateway, StripeClient};
use presale_runtime::{GatewayConfig, GatewayProvider, LogMailer, MemoryStore, PostgresStore, ResendMailer};
use presale_server::{app, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Tier catalog
    let catalog = match &config.tier_catalog_path {
        Some(path) => {
            let catalog = TierCatalog::load(path)?;
            tracing::info!("✓ Loaded {} tiers from {}", catalog.len(), path.display());
            catalog
        }
        None => {
            let catalog = TierCatalog::founders();
            tracing::info!("✓ Using built-in founders catalog ({} tiers)", catalog.len());
            catalog
        }
    };

    // Initialize LLM provider
    let gateway_config = config.gateway.clone().unwrap_or_else(|| {
        tracing::warn!("⚠ AI gateway not configured - support chat will fail");
        tracing::warn!("  Set AI_GATEWAY_API_KEY in .env");
        GatewayConfig::default()
    });
    let generation = gateway_config.generation_options();
    let provider = Arc::new(GatewayProvider::new(gateway_config)?);

    if provider.health_check().await.unwrap_or(false) {
        tracing::info!("✓ AI gateway configured (model {})", generation.model);
    }

    // Initialize storage
    let (signups, purchases): (Arc<dyn SignupStore>, Arc<dyn PurchaseStore>) = match &config.database {
        Some(db) => {
            let store = Arc::new(PostgresStore::connect(db).await?);
            tracing::info!("✓ Connected to PostgreSQL");
            (store.clone() as Arc<dyn SignupStore>, store as Arc<dyn PurchaseStore>)
        }
        None => {
            tracing::warn!("⚠ DATABASE_URL not set - signups and purchases kept in memory");
            let store = Arc::new(MemoryStore::new());
            (store.clone() as Arc<dyn SignupStore>, store as Arc<dyn PurchaseStore>)
        }
    };

    // Initialize email
    let mailer: Arc<dyn Mailer> = match &config.resend_api_key {
        Some(key) => {
            tracing::info!("✓ Resend configured");
            Arc::new(ResendMailer::new(key.clone()))
        }
        None => {
            tracing::warn!("⚠ RESEND_API_KEY not set - emails are only logged");
            Arc::new(LogMailer)
        }
    };

    // Initialize payments
    let checkout: Option<Arc<dyn CheckoutGateway>> = match &config.stripe_secret_key {
        Some(key) => {
            tracing::info!("✓ Stripe configured");
            Some(Arc::new(StripeClient::new(key)) as Arc<dyn CheckoutGateway>)
        }
        None => {
            tracing::warn!("⚠ Stripe not configured - checkout disabled");
            tracing::warn!("  Set STRIPE_SECRET_KEY in .env");
            None
        }
    };

    if config.stripe_webhook_secret.is_none() {
        tracing::warn!("⚠ STRIPE_WEBHOOK_SECRET not set - all webhooks will be rejected");
    }

    // Build application state
    let state = AppState {
        provider,
        generation,
        catalog: Arc::new(catalog),
        signups,
        purchases,
        mailer,
        checkout,
        webhook_secret: config.stripe_webhook_secret.clone(),
        site_url: config.site_url.clone(),
        mail_from: config.mail_from.clone(),
    };

    let app = app(state, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 legal-presale server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  GET  /api/tiers       - Pricing tiers");
    tracing::info!("  POST /api/chat        - Support chat");
    tracing::info!("  POST /api/checkout    - Create Stripe checkout");
    tracing::info!("  POST /api/waitlist    - Join the waitlist");
    tracing::info!("  POST /webhook/stripe  - Stripe purchase webhook");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
