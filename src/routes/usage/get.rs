use crate::db;
use crate::helpers::JsonResponse;
use crate::models::{self, FeatureKey, LimitValue, PricingTier, UsageKind};
use crate::services::entitlement;
use actix_web::{get, web, Responder, Result};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FeatureUsage {
    pub feature: &'static str,
    pub limit: LimitValue,
    pub used: u32,
    pub remaining: Option<u32>,
}

impl FeatureUsage {
    fn new(tier: PricingTier, key: FeatureKey, used: u32) -> Self {
        Self {
            feature: key.as_str(),
            limit: tier.plan().limits.get(key),
            used,
            remaining: entitlement::remaining(tier, used, key),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub tier: PricingTier,
    pub features: Vec<FeatureUsage>,
}

/// Today's consumption against the account's plan, for quota displays.
#[tracing::instrument(name = "Get usage summary.", skip(pg_pool))]
#[get("")]
pub async fn summary_handler(
    user: web::ReqData<Arc<models::User>>,
    pg_pool: web::Data<PgPool>,
) -> Result<impl Responder> {
    let tier = db::subscription::tier_for_user(pg_pool.get_ref(), &user.id)
        .await
        .map_err(|err| JsonResponse::<UsageSummary>::build().internal_server_error(err))?;

    let documents = db::usage::today_count(pg_pool.get_ref(), &user.id, UsageKind::DocumentUpload)
        .await
        .map_err(|err| JsonResponse::<UsageSummary>::build().internal_server_error(err))?;
    let api_calls = db::usage::today_count(pg_pool.get_ref(), &user.id, UsageKind::ApiCall)
        .await
        .map_err(|err| JsonResponse::<UsageSummary>::build().internal_server_error(err))?;

    let summary = UsageSummary {
        tier,
        features: vec![
            FeatureUsage::new(tier, FeatureKey::DocumentsPerDay, documents.max(0) as u32),
            FeatureUsage::new(tier, FeatureKey::ApiCallsPerDay, api_calls.max(0) as u32),
        ],
    };

    Ok(JsonResponse::build().set_item(summary).ok("OK"))
}
