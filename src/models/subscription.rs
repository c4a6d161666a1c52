use crate::models::PricingTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a paid plan is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Monthly,
    Yearly,
}

/// Billing state for one account, written by the Stripe webhook handler.
/// An account with no row, or a row that is not `active`, resolves to the
/// free tier.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: i32,
    pub user_id: String,
    pub tier: PricingTier,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub status: String, // active | past_due | canceled
    pub current_period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
