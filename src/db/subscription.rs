use crate::models::{self, PricingTier};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::Instrument;

const COLUMNS: &str = "id, user_id, tier, stripe_customer_id, stripe_subscription_id, \
                       status, current_period_end, created_at, updated_at";

/// The tier an account is entitled to right now. No active subscription
/// resolves to the free tier.
pub async fn tier_for_user(pool: &PgPool, user_id: &str) -> Result<PricingTier, String> {
    let query_span = tracing::info_span!("Resolving tier for user.");
    sqlx::query_scalar::<_, PricingTier>(
        "SELECT tier FROM subscription WHERE user_id = $1 AND status = 'active'",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map(|tier| tier.unwrap_or_default())
    .map_err(|e| {
        tracing::error!("Failed to resolve tier: {:?}", e);
        "Failed to fetch".to_string()
    })
}

pub async fn fetch_by_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<models::Subscription>, String> {
    let query_span = tracing::info_span!("Fetching subscription.");
    sqlx::query_as::<_, models::Subscription>(&format!(
        "SELECT {COLUMNS} FROM subscription WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch subscription: {:?}", e);
        "Failed to fetch".to_string()
    })
}

#[allow(clippy::too_many_arguments)]
pub async fn upsert(
    pool: &PgPool,
    user_id: &str,
    tier: PricingTier,
    stripe_customer_id: Option<&str>,
    stripe_subscription_id: Option<&str>,
    status: &str,
    current_period_end: Option<DateTime<Utc>>,
) -> Result<(), String> {
    let query_span = tracing::info_span!("Upserting subscription.");
    sqlx::query(
        r#"
        INSERT INTO subscription
            (user_id, tier, stripe_customer_id, stripe_subscription_id,
             status, current_period_end, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, now(), now())
        ON CONFLICT (user_id) DO UPDATE SET
            tier = EXCLUDED.tier,
            stripe_customer_id = COALESCE(EXCLUDED.stripe_customer_id, subscription.stripe_customer_id),
            stripe_subscription_id = COALESCE(EXCLUDED.stripe_subscription_id, subscription.stripe_subscription_id),
            status = EXCLUDED.status,
            current_period_end = EXCLUDED.current_period_end,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(tier)
    .bind(stripe_customer_id)
    .bind(stripe_subscription_id)
    .bind(status)
    .bind(current_period_end)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|_| ())
    .map_err(|e| {
        tracing::error!("Failed to upsert subscription: {:?}", e);
        "Failed to update".to_string()
    })
}

/// Refresh tier/status from a `customer.subscription.updated` event.
/// A no-op when the subscription id is not on file yet.
pub async fn update_by_stripe_id(
    pool: &PgPool,
    stripe_subscription_id: &str,
    tier: Option<PricingTier>,
    status: &str,
    current_period_end: Option<DateTime<Utc>>,
) -> Result<u64, String> {
    let query_span = tracing::info_span!("Updating subscription from webhook.");
    sqlx::query(
        r#"
        UPDATE subscription SET
            tier = COALESCE($2, tier),
            status = $3,
            current_period_end = $4,
            updated_at = now()
        WHERE stripe_subscription_id = $1
        "#,
    )
    .bind(stripe_subscription_id)
    .bind(tier)
    .bind(status)
    .bind(current_period_end)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|result| result.rows_affected())
    .map_err(|e| {
        tracing::error!("Failed to update subscription: {:?}", e);
        "Failed to update".to_string()
    })
}

/// Downgrade on `customer.subscription.deleted`.
pub async fn mark_canceled(pool: &PgPool, stripe_subscription_id: &str) -> Result<(), String> {
    let query_span = tracing::info_span!("Canceling subscription.");
    sqlx::query(
        "UPDATE subscription SET status = 'canceled', updated_at = now() \
         WHERE stripe_subscription_id = $1",
    )
    .bind(stripe_subscription_id)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|_| ())
    .map_err(|e| {
        tracing::error!("Failed to cancel subscription: {:?}", e);
        "Failed to update".to_string()
    })
}
