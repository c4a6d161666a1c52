use crate::models;
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

pub async fn insert(
    pool: &PgPool,
    document_id: Uuid,
    user_id: &str,
    role: &str,
    content: &str,
) -> Result<models::ChatMessage, String> {
    let query_span = tracing::info_span!("Saving chat message.");
    sqlx::query_as::<_, models::ChatMessage>(
        r#"
        INSERT INTO chat_message (id, document_id, user_id, role, content, created_at)
        VALUES ($1, $2, $3, $4, $5, now())
        RETURNING id, document_id, user_id, role, content, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(document_id)
    .bind(user_id)
    .bind(role)
    .bind(content)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert chat message: {:?}", e);
        "Failed to insert".to_string()
    })
}

pub async fn fetch_for_document(
    pool: &PgPool,
    document_id: Uuid,
) -> Result<Vec<models::ChatMessage>, String> {
    let query_span = tracing::info_span!("Fetching chat history.");
    sqlx::query_as::<_, models::ChatMessage>(
        r#"
        SELECT id, document_id, user_id, role, content, created_at
        FROM chat_message WHERE document_id = $1 ORDER BY created_at
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch chat history: {:?}", e);
        "Failed to fetch".to_string()
    })
}

/// Questions already asked about a document, the counter behind the
/// per-document chat quota.
pub async fn question_count(pool: &PgPool, document_id: Uuid) -> Result<i64, String> {
    let query_span = tracing::info_span!("Counting chat questions.");
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM chat_message WHERE document_id = $1 AND role = $2",
    )
    .bind(document_id)
    .bind(models::ROLE_USER)
    .fetch_one(pool)
    .instrument(query_span)
    .await
    .map_err(|e| {
        tracing::error!("Failed to count questions: {:?}", e);
        "Failed to fetch".to_string()
    })
}
