//! Router tests driven through `tower::ServiceExt::oneshot`

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use tower::ServiceExt;

use presale_core::{
    ChatCompletion, GenerationOptions, LlmProvider, Mailer, Message, OutgoingEmail, PresaleError,
    Role, TierCatalog,
};
use presale_payments::{CheckoutGateway, HostedSession, SessionParams};
use presale_runtime::MemoryStore;
use presale_server::{router, AppState};

const SECRET: &str = "whsec_router_test";

// ============================================================================
// Fakes
// ============================================================================

#[derive(Clone, Copy)]
enum Upstream {
    Reply,
    RateLimited,
    PaymentRequired,
    Broken,
}

struct FakeProvider {
    mode: Upstream,
    seen: Mutex<Vec<Vec<Message>>>,
}

#[async_trait]
impl LlmProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn health_check(&self) -> presale_core::Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> presale_core::Result<ChatCompletion> {
        self.seen.lock().unwrap().push(messages.to_vec());
        match self.mode {
            Upstream::Reply => Ok(ChatCompletion::from_reply(&options.model, "We are here to help.")),
            Upstream::RateLimited => Err(PresaleError::RateLimited),
            Upstream::PaymentRequired => Err(PresaleError::PaymentRequired),
            Upstream::Broken => Err(PresaleError::Provider("500: upstream exploded".into())),
        }
    }
}

#[derive(Default)]
struct FakeGateway {
    calls: Mutex<Vec<SessionParams>>,
}

#[async_trait]
impl CheckoutGateway for FakeGateway {
    async fn create_session(&self, params: SessionParams) -> presale_payments::Result<HostedSession> {
        let id = format!("cs_test_{}", params.tier);
        self.calls.lock().unwrap().push(params);
        Ok(HostedSession {
            url: format!("https://checkout.stripe.com/c/pay/{id}"),
            id,
        })
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> presale_core::Result<String> {
        self.sent.lock().unwrap().push(email);
        Ok("msg_test".into())
    }
}

struct Harness {
    app: Router,
    provider: Arc<FakeProvider>,
    gateway: Arc<FakeGateway>,
    store: Arc<MemoryStore>,
    mailer: Arc<RecordingMailer>,
}

struct Options {
    upstream: Upstream,
    checkout: bool,
    webhook_secret: Option<&'static str>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            upstream: Upstream::Reply,
            checkout: true,
            webhook_secret: Some(SECRET),
        }
    }
}

fn harness(options: Options) -> Harness {
    let provider = Arc::new(FakeProvider {
        mode: options.upstream,
        seen: Mutex::new(Vec::new()),
    });
    let gateway = Arc::new(FakeGateway::default());
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());

    let state = AppState {
        provider: provider.clone(),
        generation: GenerationOptions::default(),
        catalog: Arc::new(TierCatalog::founders()),
        signups: store.clone(),
        purchases: store.clone(),
        mailer: mailer.clone(),
        checkout: options
            .checkout
            .then(|| gateway.clone() as Arc<dyn CheckoutGateway>),
        webhook_secret: options.webhook_secret.map(String::from),
        site_url: "https://presale.example".into(),
        mail_from: "4D LegalTech AI <onboarding@resend.dev>".into(),
    };

    Harness {
        app: router(state),
        provider,
        gateway,
        store,
        mailer,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn webhook(payload: &str, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::post("/webhook/stripe").header("content-type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header("stripe-signature", sig);
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

fn stripe_event(event_type: &str, metadata: Value) -> String {
    let now = chrono::Utc::now().timestamp();
    json!({
        "id": "evt_test",
        "object": "event",
        "api_version": "2023-10-16",
        "created": now,
        "data": {"object": {
            "id": "cs_test_paid",
            "object": "checkout.session",
            "amount_subtotal": 16500,
            "amount_total": 16500,
            "automatic_tax": {"enabled": false, "liability": null, "status": null},
            "created": now - 120,
            "currency": "usd",
            "custom_fields": [],
            "custom_text": {
                "after_submit": null,
                "shipping_address": null,
                "submit": null,
                "terms_of_service_acceptance": null
            },
            "expires_at": now + 86_400,
            "livemode": false,
            "metadata": metadata,
            "mode": "payment",
            "payment_intent": "pi_test",
            "payment_method_types": ["card"],
            "payment_status": "paid",
            "shipping_options": [],
            "status": "complete",
            "url": null
        }},
        "livemode": false,
        "pending_webhooks": 1,
        "request": {"id": null, "idempotency_key": null},
        "type": event_type
    })
    .to_string()
}

fn completed_session(metadata: Value) -> String {
    stripe_event("checkout.session.completed", metadata)
}

fn sign_with(secret: &str, payload: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(format!("{timestamp}.{payload}").as_bytes());
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}

fn sign_now(payload: &str) -> String {
    sign_with(SECRET, payload)
}

fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

// ============================================================================
// Health & tiers
// ============================================================================

#[tokio::test]
async fn health_reports_configuration() {
    let h = harness(Options {
        webhook_secret: None,
        ..Default::default()
    });
    let (status, body) = send(&h.app, Request::get("/health").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["stripe_configured"], true);
    assert_eq!(body["webhook_verification"], false);
    assert_eq!(body["tiers"], 7);
}

#[tokio::test]
async fn tiers_are_listed_in_order() {
    let h = harness(Options::default());
    let (status, body) = send(&h.app, Request::get("/api/tiers").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    let tiers = body.as_array().unwrap();
    assert_eq!(tiers.len(), 7);
    assert_eq!(tiers[0]["id"], "supporter");
    assert_eq!(tiers[1]["id"], "analyzer_lifetime_founder");
    assert_eq!(tiers[1]["price_cents"], 4900);
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn chat_relays_whole_transcript_after_system_prompt() {
    let h = harness(Options::default());
    let transcript = json!({"messages": [
        {"role": "assistant", "content": "Hi! How can I help?"},
        {"role": "user", "content": "What does the analyzer do?"},
        {"role": "assistant", "content": "It builds timelines."},
        {"role": "user", "content": "How much is it?"},
    ]});

    let (status, body) = send(&h.app, post_json("/api/chat", transcript)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["choices"][0]["message"]["content"], "We are here to help.");
    assert_eq!(body["choices"][0]["message"]["role"], "assistant");

    let seen = h.provider.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].len(), 5);
    assert_eq!(seen[0][0].role, Role::System);
    assert_eq!(seen[0][1].content, "Hi! How can I help?");
    assert_eq!(seen[0][4].content, "How much is it?");
}

#[tokio::test]
async fn chat_rejects_empty_transcript() {
    let h = harness(Options::default());
    let (status, _) = send(&h.app, post_json("/api/chat", json!({"messages": []}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.provider.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn chat_maps_upstream_failures() {
    let cases = [
        (
            Upstream::RateLimited,
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limits exceeded, please try again later.",
        ),
        (
            Upstream::PaymentRequired,
            StatusCode::PAYMENT_REQUIRED,
            "Service temporarily unavailable.",
        ),
        (Upstream::Broken, StatusCode::INTERNAL_SERVER_ERROR, "AI service error"),
    ];

    for (upstream, expected_status, expected_error) in cases {
        let h = harness(Options {
            upstream,
            ..Default::default()
        });
        let request = post_json("/api/chat", json!({"messages": [{"role": "user", "content": "hi"}]}));
        let (status, body) = send(&h.app, request).await;

        assert_eq!(status, expected_status);
        assert_eq!(body["error"], expected_error);
    }
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn checkout_returns_session_for_known_tier() {
    let h = harness(Options::default());
    let request = post_json(
        "/api/checkout",
        json!({"tier": "parent_single_case", "email": "pat@example.com", "name": " Pat "}),
    );

    let (status, body) = send(&h.app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionId"], "cs_test_parent_single_case");
    assert_eq!(body["url"], "https://checkout.stripe.com/c/pay/cs_test_parent_single_case");

    let calls = h.gateway.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].unit_amount, 16_500);
    assert_eq!(calls[0].customer_name, "Pat");
    assert_eq!(calls[0].success_url, "https://presale.example/?success=true&tier=parent_single_case");
}

#[tokio::test]
async fn checkout_unknown_tier_creates_no_session() {
    let h = harness(Options::default());
    let request = post_json(
        "/api/checkout",
        json!({"tier": "platinum", "email": "pat@example.com", "name": "Pat"}),
    );

    let (status, body) = send(&h.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid tier: platinum");
    assert!(h.gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn checkout_revalidates_form() {
    let h = harness(Options::default());
    let request = post_json(
        "/api/checkout",
        json!({"tier": "parent_single_case", "email": "not-an-email", "name": "Pat"}),
    );

    let (status, body) = send(&h.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter a valid email address");
    assert!(h.gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn checkout_unavailable_without_stripe() {
    let h = harness(Options {
        checkout: false,
        ..Default::default()
    });
    let request = post_json(
        "/api/checkout",
        json!({"tier": "parent_single_case", "email": "pat@example.com", "name": "Pat"}),
    );

    let (status, _) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn checkout_reports_unknown_tier_even_without_stripe() {
    let h = harness(Options {
        checkout: false,
        ..Default::default()
    });
    let request = post_json(
        "/api/checkout",
        json!({"tier": "platinum", "email": "pat@example.com", "name": "Pat"}),
    );

    let (status, body) = send(&h.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid tier: platinum");
}

// ============================================================================
// Waitlist
// ============================================================================

#[tokio::test]
async fn waitlist_inserts_row_and_sends_welcome() {
    let h = harness(Options::default());
    let request = post_json(
        "/api/waitlist",
        json!({"name": "Jo", "email": "jo@example.com", "tier": "supporter"}),
    );

    let (status, body) = send(&h.app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "jo@example.com");
    assert_eq!(body["data"]["tier"], "supporter");

    assert_eq!(h.store.signups().len(), 1);
    let sent = h.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["jo@example.com".to_string()]);
    assert_eq!(sent[0].subject, "Welcome to the Justice Movement - Supporter Tier");
}

#[tokio::test]
async fn waitlist_rejects_unknown_tier() {
    let h = harness(Options::default());
    let request = post_json(
        "/api/waitlist",
        json!({"name": "Jo", "email": "jo@example.com", "tier": "gold"}),
    );

    let (status, _) = send(&h.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.store.signups().is_empty());
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn waitlist_reports_first_validation_error() {
    let h = harness(Options::default());
    let request = post_json("/api/waitlist", json!({"name": "  ", "email": "bad", "tier": "supporter"}));

    let (status, body) = send(&h.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter your name");
}

// ============================================================================
// Webhook
// ============================================================================

#[tokio::test]
async fn webhook_records_purchase_and_sends_one_email() {
    let h = harness(Options::default());
    let payload = completed_session(json!({
        "tier": "parent_single_case",
        "name": "Pat",
        "email": "pat@example.com",
    }));

    let (status, body) = send(&h.app, webhook(&payload, Some(sign_now(&payload)))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);

    let purchases = h.store.purchases();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].stripe_session_id, "cs_test_paid");
    assert_eq!(purchases[0].stripe_payment_intent.as_deref(), Some("pi_test"));
    assert_eq!(purchases[0].amount_paid, 16_500);
    assert_eq!(purchases[0].payment_status, "completed");
    assert_eq!(h.mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn webhook_missing_metadata_is_400_and_records_nothing() {
    let h = harness(Options::default());
    let payload = completed_session(json!({"tier": "parent_single_case"}));

    let (status, body) = send(&h.app, webhook(&payload, Some(sign_now(&payload)))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing metadata");
    assert!(h.store.purchases().is_empty());
    assert!(h.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn webhook_without_signature_is_400() {
    let h = harness(Options::default());
    let payload = completed_session(json!({}));

    let (status, body) = send(&h.app, webhook(&payload, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No signature");
}

#[tokio::test]
async fn webhook_fails_closed_without_secret() {
    let h = harness(Options {
        webhook_secret: None,
        ..Default::default()
    });
    let payload = completed_session(json!({
        "tier": "parent_single_case",
        "name": "Pat",
        "email": "pat@example.com",
    }));

    let (status, _) = send(&h.app, webhook(&payload, Some(sign_now(&payload)))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.store.purchases().is_empty());
}

#[tokio::test]
async fn webhook_forged_signature_is_400() {
    let h = harness(Options::default());
    let payload = completed_session(json!({
        "tier": "parent_single_case",
        "name": "Pat",
        "email": "pat@example.com",
    }));
    let forged = sign_with("whsec_attacker", &payload);

    let (status, _) = send(&h.app, webhook(&payload, Some(forged))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.store.purchases().is_empty());
}

#[tokio::test]
async fn webhook_acknowledges_other_events() {
    let h = harness(Options::default());
    let payload = stripe_event(
        "checkout.session.expired",
        json!({"tier": "parent_single_case", "name": "Pat", "email": "pat@example.com"}),
    );

    let (status, _) = send(&h.app, webhook(&payload, Some(sign_now(&payload)))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(h.store.purchases().is_empty());
}

// ============================================================================
// Malformed bodies
// ============================================================================

#[tokio::test]
async fn unparseable_bodies_get_json_errors() {
    for uri in ["/api/chat", "/api/checkout", "/api/waitlist"] {
        let h = harness(Options::default());
        let (status, body) = send(&h.app, post_raw(uri, "not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "Invalid request body", "{uri}");
        assert_eq!(body["code"], "INVALID_BODY", "{uri}");
    }
}

#[tokio::test]
async fn wrong_shaped_bodies_get_json_errors() {
    let cases = [
        ("/api/chat", json!({"messages": [{"role": "bot", "content": "hi"}]})),
        ("/api/checkout", json!({"tier": "parent_single_case", "name": "Pat"})),
        ("/api/waitlist", json!({"name": "Jo", "tier": "supporter"})),
    ];

    for (uri, payload) in cases {
        let h = harness(Options::default());
        let (status, body) = send(&h.app, post_json(uri, payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], "INVALID_BODY", "{uri}");
        assert!(h.provider.seen.lock().unwrap().is_empty());
        assert!(h.gateway.calls.lock().unwrap().is_empty());
        assert!(h.store.signups().is_empty());
    }
}

#[tokio::test]
async fn webhook_non_utf8_body_is_400_json() {
    let h = harness(Options::default());
    let request = Request::post("/webhook/stripe")
        .header("stripe-signature", "t=1,v1=00")
        .body(Body::from(vec![0xff, 0xfe, 0xfd]))
        .unwrap();

    let (status, body) = send(&h.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid webhook");
    assert!(h.store.purchases().is_empty());
}
