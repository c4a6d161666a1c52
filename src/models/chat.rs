use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

/// One turn of a document conversation. The per-document question count
/// used for quota checks is the number of `user` rows.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: String,
    pub role: String, // user | assistant
    pub content: String,
    pub created_at: DateTime<Utc>,
}
