//! Server configuration
//!
//! Every setting comes from the environment (optionally a `.env` file loaded
//! by `main`). Integrations whose keys are absent stay disabled instead of
//! failing startup.

use std::path::PathBuf;

use presale_core::mail::DEFAULT_FROM;
use presale_runtime::{GatewayConfig, PostgresConfig};

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind (e.g. `0.0.0.0:3000`)
    pub bind_addr: String,

    /// Public origin used to build checkout redirect URLs
    pub site_url: String,

    /// Compiled web bundle served as the fallback route
    pub static_dir: PathBuf,

    /// Optional JSON tier catalog; the built-in founders catalog otherwise
    pub tier_catalog_path: Option<PathBuf>,

    /// `None` when `DATABASE_URL` is unset (in-memory store)
    pub database: Option<PostgresConfig>,

    /// `None` when `AI_GATEWAY_API_KEY` is unset
    pub gateway: Option<GatewayConfig>,

    pub stripe_secret_key: Option<String>,

    /// Without it every webhook is rejected
    pub stripe_webhook_secret: Option<String>,

    pub resend_api_key: Option<String>,

    pub mail_from: String,
}

impl ServerConfig {
    /// Load from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into());
        let site_url = var("SITE_URL")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let database = var("DATABASE_URL").map(|url| {
            let mut db = PostgresConfig::new(url);
            db.max_connections = parse_env(&var, "DATABASE_MAX_CONNECTIONS", db.max_connections);
            db.connect_timeout_secs =
                parse_env(&var, "DATABASE_CONNECT_TIMEOUT_SECS", db.connect_timeout_secs);
            db.run_migrations = parse_env_bool(&var, "DATABASE_RUN_MIGRATIONS", db.run_migrations);
            db
        });

        let gateway = var("AI_GATEWAY_API_KEY").map(|api_key| {
            let defaults = GatewayConfig::default();
            GatewayConfig {
                url: var("AI_GATEWAY_URL").unwrap_or(defaults.url),
                api_key,
                model: var("AI_GATEWAY_MODEL").unwrap_or(defaults.model),
                timeout_secs: parse_env(&var, "AI_GATEWAY_TIMEOUT_SECS", defaults.timeout_secs),
            }
        });

        Self {
            bind_addr,
            site_url,
            static_dir: var("STATIC_DIR").map_or_else(|| PathBuf::from("static"), PathBuf::from),
            tier_catalog_path: var("TIER_CATALOG_PATH").map(PathBuf::from),
            database,
            gateway,
            stripe_secret_key: var("STRIPE_SECRET_KEY"),
            stripe_webhook_secret: var("STRIPE_WEBHOOK_SECRET"),
            resend_api_key: var("RESEND_API_KEY"),
            mail_from: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_FROM.into()),
        }
    }
}

/// Parse `key` as `T`, returning `default` on missing or invalid values.
fn parse_env<T, F>(var: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Accepts `true`/`1`/`false`/`0` (case-insensitive).
fn parse_env_bool<F>(var: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match var(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
