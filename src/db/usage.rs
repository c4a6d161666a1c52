use crate::models::UsageKind;
use sqlx::PgPool;
use tracing::Instrument;

/// Actions of this kind already taken today. Zero when no row exists yet.
pub async fn today_count(pool: &PgPool, user_id: &str, kind: UsageKind) -> Result<i32, String> {
    let query_span = tracing::info_span!("Fetching today's usage counter.");
    sqlx::query_scalar::<_, i32>(
        "SELECT count FROM usage_counter WHERE user_id = $1 AND kind = $2 AND period_day = CURRENT_DATE",
    )
    .bind(user_id)
    .bind(kind)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map(|count| count.unwrap_or(0))
    .map_err(|e| {
        tracing::error!("Failed to fetch usage counter: {:?}", e);
        "Failed to fetch".to_string()
    })
}

pub async fn increment(pool: &PgPool, user_id: &str, kind: UsageKind) -> Result<i32, String> {
    increment_by(pool, user_id, kind, 1).await
}

/// Atomic upsert-increment; the unique (user, kind, day) key keeps
/// concurrent requests from double-counting.
pub async fn increment_by(
    pool: &PgPool,
    user_id: &str,
    kind: UsageKind,
    by: i32,
) -> Result<i32, String> {
    let query_span = tracing::info_span!("Incrementing usage counter.");
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO usage_counter (user_id, kind, period_day, count)
        VALUES ($1, $2, CURRENT_DATE, $3)
        ON CONFLICT (user_id, kind, period_day)
        DO UPDATE SET count = usage_counter.count + EXCLUDED.count
        RETURNING count
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .bind(by)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|e| {
        tracing::error!("Failed to increment usage counter: {:?}", e);
        "Failed to update".to_string()
    })
}
