//! legal-presale HTTP server
//!
//! One axum service for the landing page: support chat relay, hosted
//! checkout, waitlist signups and the Stripe purchase webhook. The compiled
//! web bundle is served for every other path.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{
    chat_handler, create_checkout, health_check, join_waitlist, list_tiers, stripe_webhook,
};

pub use crate::config::ServerConfig;
pub use crate::error::{ApiError, ErrorResponse};
pub use crate::state::AppState;

/// API routes only
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/tiers", get(list_tiers))
        // Support chat
        .route("/api/chat", post(chat_handler))
        // Presale
        .route("/api/checkout", post(create_checkout))
        .route("/api/waitlist", post(join_waitlist))
        .route("/webhook/stripe", post(stripe_webhook))
        .with_state(state)
}

/// Full application: API routes, static fallback, CORS and request tracing
pub fn app(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
