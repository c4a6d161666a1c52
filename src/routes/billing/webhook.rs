use crate::configuration::Settings;
use crate::db;
use crate::helpers::JsonResponse;
use crate::models::PricingTier;
use crate::services::billing;
use actix_web::{post, web, HttpRequest, Responder, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use std::collections::HashMap;

#[derive(Deserialize, Debug)]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Deserialize, Debug)]
struct EventData {
    object: serde_json::Value,
}

#[derive(Deserialize, Debug)]
struct CheckoutSessionObject {
    client_reference_id: Option<String>,
    customer: Option<String>,
    subscription: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Deserialize, Debug)]
struct SubscriptionObject {
    id: String,
    status: String,
    current_period_end: Option<i64>,
    items: SubscriptionItems,
}

#[derive(Deserialize, Debug)]
struct SubscriptionItems {
    data: Vec<SubscriptionItem>,
}

#[derive(Deserialize, Debug)]
struct SubscriptionItem {
    price: Price,
}

#[derive(Deserialize, Debug)]
struct Price {
    id: String,
}

fn period_end(timestamp: Option<i64>) -> Option<DateTime<Utc>> {
    timestamp.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
}

/// Stripe event sink. Signature is verified against the raw body before the
/// payload is trusted; unhandled event types are acknowledged so Stripe
/// stops retrying them.
#[tracing::instrument(name = "Handle billing webhook.", skip(req, body, settings, pg_pool))]
#[post("/webhook")]
pub async fn webhook_handler(
    req: HttpRequest,
    body: web::Bytes,
    settings: web::Data<Settings>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let signature = req
        .headers()
        .get("Stripe-Signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            JsonResponse::<serde_json::Value>::build().bad_request("Missing Stripe-Signature header")
        })?;

    billing::verify_webhook_signature(&body, signature, &settings.billing.webhook_secret)
        .map_err(|err| JsonResponse::<serde_json::Value>::build().bad_request(err))?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|err| JsonResponse::<serde_json::Value>::build().bad_request(err))?;

    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let session: CheckoutSessionObject = serde_json::from_value(event.data.object)
                .map_err(|err| JsonResponse::<serde_json::Value>::build().bad_request(err))?;
            handle_checkout_completed(pg_pool.get_ref(), session).await?;
        }
        "customer.subscription.updated" => {
            let subscription: SubscriptionObject = serde_json::from_value(event.data.object)
                .map_err(|err| JsonResponse::<serde_json::Value>::build().bad_request(err))?;
            handle_subscription_updated(pg_pool.get_ref(), settings.get_ref(), subscription)
                .await?;
        }
        "customer.subscription.deleted" => {
            let subscription: SubscriptionObject = serde_json::from_value(event.data.object)
                .map_err(|err| JsonResponse::<serde_json::Value>::build().bad_request(err))?;
            db::subscription::mark_canceled(pg_pool.get_ref(), &subscription.id)
                .await
                .map_err(|err| {
                    JsonResponse::<serde_json::Value>::build().internal_server_error(err)
                })?;
            tracing::info!("Subscription {} canceled", subscription.id);
        }
        other => {
            tracing::debug!("Ignoring webhook event type {}", other);
        }
    }

    Ok(JsonResponse::<serde_json::Value>::build().ok("OK"))
}

async fn handle_checkout_completed(
    pool: &PgPool,
    session: CheckoutSessionObject,
) -> Result<(), actix_web::Error> {
    let user_id = session.client_reference_id.ok_or_else(|| {
        JsonResponse::<serde_json::Value>::build().bad_request("Checkout session carries no user")
    })?;

    let tier = session
        .metadata
        .get("tier")
        .and_then(|raw| raw.parse::<PricingTier>().ok())
        .ok_or_else(|| {
            JsonResponse::<serde_json::Value>::build()
                .bad_request("Checkout session carries no known tier")
        })?;

    db::subscription::upsert(
        pool,
        &user_id,
        tier,
        session.customer.as_deref(),
        session.subscription.as_deref(),
        "active",
        None,
    )
    .await
    .map_err(|err| JsonResponse::<serde_json::Value>::build().internal_server_error(err))?;

    tracing::info!("User {} subscribed to {}", user_id, tier);
    Ok(())
}

async fn handle_subscription_updated(
    pool: &PgPool,
    settings: &Settings,
    subscription: SubscriptionObject,
) -> Result<(), actix_web::Error> {
    let tier = subscription
        .items
        .data
        .first()
        .and_then(|item| settings.billing.tier_for_price(&item.price.id));

    let updated = db::subscription::update_by_stripe_id(
        pool,
        &subscription.id,
        tier,
        &subscription.status,
        period_end(subscription.current_period_end),
    )
    .await
    .map_err(|err| JsonResponse::<serde_json::Value>::build().internal_server_error(err))?;

    if updated == 0 {
        // checkout.session.completed has not landed yet; the next update
        // event will catch up
        tracing::warn!("Subscription {} not on file yet", subscription.id);
    }

    Ok(())
}
