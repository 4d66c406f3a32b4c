//! Stripe Checkout Integration
//!
//! Hosted checkout for one-off presale seats. Prices come from the tier
//! catalog; the tier is resolved before any call to Stripe.

use std::collections::HashMap;

use async_trait::async_trait;
use presale_core::{CheckoutRequest, CheckoutResponse, TierCatalog};
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, Currency,
};

use crate::error::{PaymentError, Result};

const PRODUCT_DESCRIPTION: &str = "Pre-launch presale access to the Justice Engine platform";

/// Everything needed to open one hosted checkout session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionParams {
    pub tier: String,
    pub product_name: String,
    pub description: String,
    pub unit_amount: i64,
    pub customer_email: String,
    pub customer_name: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl SessionParams {
    /// Metadata attached to the session and read back by the webhook
    pub fn metadata(&self) -> HashMap<String, String> {
        HashMap::from([
            ("tier".to_string(), self.tier.clone()),
            ("name".to_string(), self.customer_name.clone()),
            ("email".to_string(), self.customer_email.clone()),
        ])
    }
}

/// A created hosted session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostedSession {
    pub id: String,
    pub url: String,
}

/// Payment-session provider seam
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_session(&self, params: SessionParams) -> Result<HostedSession>;
}

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
}

impl StripeClient {
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
}

#[async_trait]
impl CheckoutGateway for StripeClient {
    async fn create_session(&self, request: SessionParams) -> Result<HostedSession> {
        let mut params = CreateCheckoutSession::new();
        params.customer_email = Some(&request.customer_email);
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.mode = Some(CheckoutSessionMode::Payment);
        params.metadata = Some(request.metadata());

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency: Currency::USD,
                unit_amount: Some(request.unit_amount),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: request.product_name.clone(),
                    description: Some(request.description.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Stripe("No checkout URL returned".into()))?;

        Ok(HostedSession {
            id: session.id.to_string(),
            url,
        })
    }
}

/// Checkout flow for presale seats
pub struct PresaleCheckout<'a> {
    catalog: &'a TierCatalog,
    gateway: &'a dyn CheckoutGateway,
    site_url: &'a str,
}

impl<'a> PresaleCheckout<'a> {
    pub fn new(catalog: &'a TierCatalog, gateway: &'a dyn CheckoutGateway, site_url: &'a str) -> Self {
        Self {
            catalog,
            gateway,
            site_url: site_url.trim_end_matches('/'),
        }
    }

    /// Resolve the price and build session parameters.
    ///
    /// Free tiers are not sold through checkout and count as invalid here.
    pub fn session_params(&self, request: &CheckoutRequest) -> Result<SessionParams> {
        let tier = self
            .catalog
            .get(&request.tier)
            .ok_or_else(|| PaymentError::InvalidTier(request.tier.clone()))?;
        let unit_amount = tier
            .price_cents
            .ok_or_else(|| PaymentError::InvalidTier(request.tier.clone()))?;

        Ok(SessionParams {
            tier: tier.id.to_string(),
            product_name: tier.checkout_name(),
            description: PRODUCT_DESCRIPTION.into(),
            unit_amount,
            customer_email: request.email.clone(),
            customer_name: request.name.clone(),
            success_url: format!("{}/?success=true&tier={}", self.site_url, tier.id),
            cancel_url: format!("{}/?canceled=true", self.site_url),
        })
    }

    /// Create the hosted session and return `{sessionId, url}`
    pub async fn create(&self, request: &CheckoutRequest) -> Result<CheckoutResponse> {
        let params = self.session_params(request)?;

        tracing::info!(tier = %params.tier, email = %params.customer_email, "Creating checkout session");

        let session = self.gateway.create_session(params).await?;

        tracing::info!(session_id = %session.id, "Checkout session created");

        Ok(CheckoutResponse {
            session_id: session.id,
            url: session.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingGateway {
        calls: Mutex<Vec<SessionParams>>,
    }

    #[async_trait]
    impl CheckoutGateway for RecordingGateway {
        async fn create_session(&self, params: SessionParams) -> Result<HostedSession> {
            let id = format!("cs_test_{}", params.tier);
            self.calls.lock().unwrap().push(params);
            Ok(HostedSession {
                url: format!("https://checkout.stripe.com/c/pay/{id}"),
                id,
            })
        }
    }

    fn request(tier: &str) -> CheckoutRequest {
        CheckoutRequest {
            tier: tier.into(),
            email: "sam@example.com".into(),
            name: "Sam".into(),
        }
    }

    #[tokio::test]
    async fn test_every_paid_tier_gets_a_session() {
        let catalog = TierCatalog::founders();
        let gateway = RecordingGateway::default();
        let checkout = PresaleCheckout::new(&catalog, &gateway, "https://presale.example/");

        for tier in catalog.paid() {
            let response = checkout.create(&request(tier.id.as_str())).await.unwrap();
            assert_eq!(response.session_id, format!("cs_test_{}", tier.id));
            assert!(response.url.starts_with("https://checkout.stripe.com/"));
        }
        assert_eq!(gateway.calls.lock().unwrap().len(), catalog.paid().count());
    }

    #[tokio::test]
    async fn test_unknown_tier_creates_no_session() {
        let catalog = TierCatalog::founders();
        let gateway = RecordingGateway::default();
        let checkout = PresaleCheckout::new(&catalog, &gateway, "https://presale.example");

        let err = checkout.create(&request("platinum")).await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidTier(ref t) if t == "platinum"));
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_session_params() {
        let catalog = TierCatalog::founders();
        let gateway = RecordingGateway::default();
        let checkout = PresaleCheckout::new(&catalog, &gateway, "https://presale.example/");

        let params = checkout.session_params(&request("small_firm_annual")).unwrap();
        assert_eq!(params.unit_amount, 199_900);
        assert_eq!(
            params.product_name,
            "4D LegalTech AI - Small Firm Annual Founders (Presale Seat)"
        );
        assert_eq!(params.success_url, "https://presale.example/?success=true&tier=small_firm_annual");
        assert_eq!(params.cancel_url, "https://presale.example/?canceled=true");

        let metadata = params.metadata();
        assert_eq!(metadata["tier"], "small_firm_annual");
        assert_eq!(metadata["name"], "Sam");
        assert_eq!(metadata["email"], "sam@example.com");
    }

    #[test]
    fn test_free_tier_is_not_sold() {
        let catalog = TierCatalog::founders();
        let gateway = RecordingGateway::default();
        let checkout = PresaleCheckout::new(&catalog, &gateway, "https://presale.example");
        assert!(matches!(
            checkout.session_params(&request("supporter")),
            Err(PaymentError::InvalidTier(_))
        ));
    }
}
