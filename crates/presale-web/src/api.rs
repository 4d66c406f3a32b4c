//! API Client

use presale_core::{
    ChatCompletion, ChatRequest, CheckoutRequest, CheckoutResponse, Message, Tier, TierCatalog,
    WaitlistRequest,
};
use serde::{de::DeserializeOwned, Serialize};

/// Absolute URL on the serving origin (reqwest needs one in the browser)
fn endpoint(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    format!("{origin}{path}")
}

async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, String> {
    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        let data: serde_json::Value = response.json().await.unwrap_or_default();
        Err(data["error"].as_str().unwrap_or("Request failed").to_string())
    }
}

async fn post_json<B, R>(path: &str, body: &B) -> Result<R, String>
where
    B: Serialize,
    R: DeserializeOwned,
{
    let response = reqwest::Client::new()
        .post(endpoint(path))
        .json(body)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    read_json(response).await
}

/// The tier catalog the server was started with
pub async fn list_tiers() -> Result<TierCatalog, String> {
    let response = reqwest::Client::new()
        .get(endpoint("/api/tiers"))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let tiers: Vec<Tier> = read_json(response).await?;
    TierCatalog::new(tiers).map_err(|e| e.to_string())
}

/// Send the whole transcript; returns the assistant reply
pub async fn send_chat(messages: &[Message]) -> Result<String, String> {
    let request = ChatRequest {
        messages: messages.to_vec(),
    };
    let completion: ChatCompletion = post_json("/api/chat", &request).await?;

    completion
        .reply()
        .map(str::to_string)
        .ok_or_else(|| "No response".to_string())
}

/// Join the waitlist with a free tier
pub async fn join_waitlist(request: &WaitlistRequest) -> Result<(), String> {
    let _: serde_json::Value = post_json("/api/waitlist", request).await?;
    Ok(())
}

/// Create a Stripe checkout session for a paid tier
pub async fn create_checkout(request: &CheckoutRequest) -> Result<CheckoutResponse, String> {
    post_json("/api/checkout", request).await
}
