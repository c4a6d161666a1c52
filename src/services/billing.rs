//! Thin Stripe client: checkout and billing-portal sessions, plus webhook
//! signature verification. Payment processing itself lives on Stripe's side;
//! this service only starts sessions and consumes webhook events.

use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(thiserror::Error, Debug)]
pub enum BillingError {
    #[error("Request error: {0}")]
    Request(String),
    #[error("Stripe error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PortalSession {
    pub id: String,
    pub url: String,
}

#[derive(Clone)]
pub struct StripeClient {
    api_base: String,
    secret_key: String,
    client: Client,
}

impl StripeClient {
    pub fn new(secret_key: &str) -> Self {
        Self::with_api_base(secret_key, STRIPE_API_BASE)
    }

    pub fn with_api_base(secret_key: &str, api_base: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
            client,
        }
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, BillingError> {
        let url = format!("{}{}", self.api_base, path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(params)
            .send()
            .await
            .map_err(|e| BillingError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BillingError::Api {
                status,
                message: body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BillingError::Parse(e.to_string()))
    }

    /// Start a subscription checkout for one price. The tier travels in the
    /// session metadata so the webhook can resolve it without another call.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_checkout_session(
        &self,
        price_id: &str,
        tier: &str,
        customer_email: &str,
        client_reference_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, BillingError> {
        self.post_form(
            "/v1/checkout/sessions",
            &[
                ("mode", "subscription"),
                ("line_items[0][price]", price_id),
                ("line_items[0][quantity]", "1"),
                ("metadata[tier]", tier),
                ("customer_email", customer_email),
                ("client_reference_id", client_reference_id),
                ("success_url", success_url),
                ("cancel_url", cancel_url),
            ],
        )
        .await
    }

    /// Open the self-service billing portal for an existing customer.
    pub async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, BillingError> {
        self.post_form(
            "/v1/billing_portal/sessions",
            &[("customer", customer_id), ("return_url", return_url)],
        )
        .await
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header is malformed")]
    Malformed,
    #[error("signature does not match payload")]
    Mismatch,
}

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// The header carries `t=<unix>,v1=<hex>[,v1=<hex>...]`; the signed message
/// is `<t>.<body>` keyed with the endpoint secret. Any matching `v1` entry
/// accepts the event.
pub fn verify_webhook_signature(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<&str> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if candidates.is_empty() {
        return Err(SignatureError::Malformed);
    }

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::Malformed)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = format!("{:x}", mac.finalize().into_bytes());

    if candidates.iter().any(|candidate| *candidate == expected) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], timestamp: &str, secret: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        format!("{:x}", mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_valid_signature() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let sig = sign(payload, "1700000000", "whsec_test");
        let header = format!("t=1700000000,v1={sig}");
        assert_eq!(
            verify_webhook_signature(payload, &header, "whsec_test"),
            Ok(())
        );
    }

    #[test]
    fn accepts_any_matching_v1_entry() {
        let payload = b"{}";
        let sig = sign(payload, "1700000000", "whsec_test");
        let header = format!("t=1700000000,v1=deadbeef,v1={sig}");
        assert_eq!(
            verify_webhook_signature(payload, &header, "whsec_test"),
            Ok(())
        );
    }

    #[test]
    fn rejects_wrong_secret() {
        let payload = b"{}";
        let sig = sign(payload, "1700000000", "whsec_other");
        let header = format!("t=1700000000,v1={sig}");
        assert_eq!(
            verify_webhook_signature(payload, &header, "whsec_test"),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_tampered_payload() {
        let sig = sign(b"{}", "1700000000", "whsec_test");
        let header = format!("t=1700000000,v1={sig}");
        assert_eq!(
            verify_webhook_signature(b"{\"a\":1}", &header, "whsec_test"),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_malformed_header() {
        assert_eq!(
            verify_webhook_signature(b"{}", "v1=abc", "whsec_test"),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            verify_webhook_signature(b"{}", "t=1700000000", "whsec_test"),
            Err(SignatureError::Malformed)
        );
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = StripeClient::with_api_base("sk_test", "http://localhost:12111/");
        assert_eq!(client.api_base, "http://localhost:12111");
    }
}
