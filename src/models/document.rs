use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_READY: &str = "ready";
pub const STATUS_FAILED: &str = "failed";

/// An uploaded document. Text is extracted client-side; the summary is
/// filled in by a background task once the summarizer responds.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Document {
    pub id: Uuid,
    pub user_id: String,
    pub file_name: String,
    pub page_count: i32,
    pub status: String, // pending | ready | failed
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
