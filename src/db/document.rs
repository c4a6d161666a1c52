use crate::forms;
use crate::models;
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

const RETURNING: &str =
    "id, user_id, file_name, page_count, status, summary, created_at, updated_at";

pub async fn insert(
    pool: &PgPool,
    user_id: &str,
    form: &forms::DocumentForm,
) -> Result<models::Document, String> {
    let query_span = tracing::info_span!("Saving new document row.");
    let page_count = i32::try_from(form.page_count).map_err(|_| "page count out of range")?;
    sqlx::query_as::<_, models::Document>(&format!(
        r#"
        INSERT INTO document (id, user_id, file_name, page_count, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, now(), now())
        RETURNING {RETURNING}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&form.file_name)
    .bind(page_count)
    .bind(models::STATUS_PENDING)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert document: {:?}", e);
        "Failed to insert".to_string()
    })
}

pub async fn fetch_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<models::Document>, String> {
    let query_span = tracing::info_span!("Fetching documents of a user.");
    sqlx::query_as::<_, models::Document>(&format!(
        "SELECT {RETURNING} FROM document WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch documents: {:?}", e);
        "Failed to fetch".to_string()
    })
}

pub async fn fetch_one(
    pool: &PgPool,
    id: Uuid,
    user_id: &str,
) -> Result<Option<models::Document>, String> {
    let query_span = tracing::info_span!("Fetching document by id.");
    sqlx::query_as::<_, models::Document>(&format!(
        "SELECT {RETURNING} FROM document WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch document {}: {:?}", id, e);
        "Failed to fetch".to_string()
    })
}

pub async fn set_summary(pool: &PgPool, id: Uuid, summary: &str) -> Result<(), String> {
    let query_span = tracing::info_span!("Storing document summary.");
    sqlx::query(
        "UPDATE document SET summary = $2, status = $3, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(summary)
    .bind(models::STATUS_READY)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|_| ())
    .map_err(|e| {
        tracing::error!("Failed to store summary for {}: {:?}", id, e);
        "Failed to update".to_string()
    })
}

pub async fn set_failed(pool: &PgPool, id: Uuid) -> Result<(), String> {
    let query_span = tracing::info_span!("Marking document as failed.");
    sqlx::query("UPDATE document SET status = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(models::STATUS_FAILED)
        .execute(pool)
        .instrument(query_span)
        .await
        .map(|_| ())
        .map_err(|e| {
            tracing::error!("Failed to mark document {} failed: {:?}", id, e);
            "Failed to update".to_string()
        })
}
