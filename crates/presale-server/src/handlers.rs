//! HTTP Handlers

use axum::{
    body::Bytes,
    extract::{FromRequest, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use presale_core::{
    mail,
    prompt::{with_system_prompt, SUPPORT_SYSTEM_PROMPT},
    ChatCompletion, ChatRequest, CheckoutRequest, CheckoutResponse, NewWaitlistSignup, SignupForm,
    Tier, WaitlistRequest, WaitlistSignup,
};
use presale_payments::{PaymentError, PresaleCheckout, WebhookOutcome};

use crate::error::ApiError;
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// `Json` whose rejections render through `ApiError`
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ai_gateway_connected: bool,
    pub stripe_configured: bool,
    pub webhook_verification: bool,
    pub tiers: usize,
}

#[derive(Debug, Serialize)]
pub struct WaitlistResponse {
    pub success: bool,
    pub data: WaitlistSignup,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ai_gateway_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        ai_gateway_connected,
        stripe_configured: state.checkout.is_some(),
        webhook_verification: state.webhook_secret.is_some(),
        tiers: state.catalog.len(),
    })
}

/// Pricing tiers, in display order
pub async fn list_tiers(State(state): State<AppState>) -> Json<Vec<Tier>> {
    Json(state.catalog.iter().cloned().collect())
}

/// Support chat: relay the whole transcript behind the fixed system prompt
pub async fn chat_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ChatRequest>,
) -> Result<Json<ChatCompletion>, ApiError> {
    if payload.messages.is_empty() {
        return Err(ApiError::EmptyTranscript);
    }

    tracing::info!(
        provider = state.provider.name(),
        messages = payload.messages.len(),
        "Chat request"
    );

    let messages = with_system_prompt(SUPPORT_SYSTEM_PROMPT, &payload.messages);
    let completion = state.provider.complete(&messages, &state.generation).await?;

    Ok(Json(completion))
}

/// Create a hosted checkout session for a paid tier
pub async fn create_checkout(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    state.catalog.require(&payload.tier)?;
    let valid = SignupForm::new(&payload.name, &payload.email).validate()?;
    let gateway = state.checkout.as_deref().ok_or(ApiError::PaymentsDisabled)?;

    let request = CheckoutRequest {
        tier: payload.tier,
        email: valid.email,
        name: valid.name,
    };

    let response = PresaleCheckout::new(&state.catalog, gateway, &state.site_url)
        .create(&request)
        .await?;

    Ok(Json(response))
}

/// Record a waitlist signup and send the welcome email
pub async fn join_waitlist(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<WaitlistRequest>,
) -> Result<Json<WaitlistResponse>, ApiError> {
    let valid = SignupForm::new(&payload.name, &payload.email).validate()?;
    let tier = state.catalog.require(&payload.tier)?;

    tracing::info!(tier = %tier.id, email = %valid.email, "Processing waitlist signup");

    let signup = state
        .signups
        .insert_signup(NewWaitlistSignup {
            name: valid.name,
            email: valid.email,
            tier: tier.id.to_string(),
        })
        .await?;

    tracing::info!(signup_id = %signup.id, "Waitlist signup saved");

    let content = mail::waitlist_welcome(&signup.name, Some(tier));
    let message_id = state
        .mailer
        .send(content.addressed(&state.mail_from, &signup.email))
        .await?;

    tracing::info!(message_id = %message_id, "Welcome email sent");

    Ok(Json(WaitlistResponse {
        success: true,
        data: signup,
    }))
}

/// Stripe webhook: verify, then record completed purchases
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    let body = std::str::from_utf8(&body)
        .map_err(|e| ApiError::Webhook(PaymentError::WebhookParse(format!("body is not UTF-8: {e}"))))?;

    let handler = state.webhook_handler();
    let event = handler
        .verify_and_parse(
            body,
            signature,
            state.webhook_secret.as_deref(),
            chrono::Utc::now().timestamp(),
        )
        .map_err(ApiError::Webhook)?;

    match handler.handle(event).await.map_err(ApiError::Webhook)? {
        WebhookOutcome::PurchaseRecorded { purchase, email_sent } => {
            tracing::info!(purchase_id = %purchase.id, email_sent, "Webhook processed");
        }
        WebhookOutcome::Ignored { event_type } => {
            tracing::debug!(event_type = %event_type, "Webhook acknowledged");
        }
    }

    Ok(Json(WebhookAck { received: true }))
}
