use hmac::{Hmac, Mac};
use pdfbrief::services::billing::{verify_webhook_signature, SignatureError, StripeClient};
use sha2::Sha256;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sign(payload: &[u8], timestamp: &str, secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("{:x}", mac.finalize().into_bytes())
}

#[test]
fn webhook_signature_round_trip() {
    let payload = br#"{"type":"customer.subscription.deleted","data":{"object":{"id":"sub_1"}}}"#;
    let signature = sign(payload, "1700000000", "whsec_roundtrip");
    let header = format!("t=1700000000,v1={signature}");

    assert_eq!(
        verify_webhook_signature(payload, &header, "whsec_roundtrip"),
        Ok(())
    );
    assert_eq!(
        verify_webhook_signature(payload, &header, "whsec_wrong"),
        Err(SignatureError::Mismatch)
    );
    assert_eq!(
        verify_webhook_signature(payload, "garbage", "whsec_roundtrip"),
        Err(SignatureError::Malformed)
    );
}

#[tokio::test]
async fn checkout_session_is_created_with_price_and_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(header("authorization", "Bearer sk_test_key"))
        .and(body_string_contains("mode=subscription"))
        .and(body_string_contains("price_pro_monthly"))
        .and(body_string_contains("metadata%5Btier%5D=pro"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cs_test_123",
            "url": "https://checkout.stripe.com/c/pay/cs_test_123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StripeClient::with_api_base("sk_test_key", &server.uri());
    let session = client
        .create_checkout_session(
            "price_pro_monthly",
            "pro",
            "ada@example.com",
            "usr_42",
            "https://app.example.com/success",
            "https://app.example.com/cancel",
        )
        .await
        .unwrap();

    assert_eq!(session.id, "cs_test_123");
    assert_eq!(
        session.url.as_deref(),
        Some("https://checkout.stripe.com/c/pay/cs_test_123")
    );
}

#[tokio::test]
async fn stripe_errors_surface_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/billing_portal/sessions"))
        .respond_with(
            ResponseTemplate::new(402).set_body_string(r#"{"error":{"message":"no such customer"}}"#),
        )
        .mount(&server)
        .await;

    let client = StripeClient::with_api_base("sk_test_key", &server.uri());
    let err = client
        .create_portal_session("cus_missing", "https://app.example.com/account")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("402"));
}
