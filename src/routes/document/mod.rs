mod add;
mod chat;
mod get;

pub use add::*;
pub use chat::*;
pub use get::*;

use crate::db;
use crate::helpers::JsonResponse;
use crate::models::{FeatureKey, PricingTier, UsageKind};
use crate::services::entitlement;
use crate::services::SummaryEngine;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Meter one API call and reject once the daily cap is spent.
pub(crate) async fn guard_api_call(
    pool: &PgPool,
    user_id: &str,
    tier: PricingTier,
) -> Result<(), actix_web::Error> {
    let calls = db::usage::today_count(pool, user_id, UsageKind::ApiCall)
        .await
        .map_err(|err| JsonResponse::<()>::build().internal_server_error(err))?;

    if !entitlement::can_perform_action(tier, calls.max(0) as u32, FeatureKey::ApiCallsPerDay) {
        return Err(JsonResponse::<()>::build()
            .forbidden("Daily API call limit reached. Upgrade your plan for a higher limit."));
    }

    db::usage::increment(pool, user_id, UsageKind::ApiCall)
        .await
        .map_err(|err| JsonResponse::<()>::build().internal_server_error(err))?;

    Ok(())
}

/// Summarize in the background so the upload response does not wait on the
/// model. Failures mark the document instead of surfacing to the uploader.
pub(crate) fn spawn_summarization(
    pool: PgPool,
    engine: Arc<dyn SummaryEngine>,
    document_id: Uuid,
    text: String,
) {
    tokio::spawn(async move {
        let span = tracing::info_span!("summarize_document", document_id = %document_id);
        async move {
            match engine.summarize(&text).await {
                Ok(summary) => {
                    if let Err(err) = db::document::set_summary(&pool, document_id, &summary).await
                    {
                        tracing::warn!("Failed to store summary: {}", err);
                    }
                }
                Err(err) => {
                    tracing::warn!("Summarization failed: {}", err);
                    let _ = db::document::set_failed(&pool, document_id).await;
                }
            }
        }
        .instrument(span)
        .await
    });
}
