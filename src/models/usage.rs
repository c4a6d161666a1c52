use serde::{Deserialize, Serialize};

/// A metered action kind. Counters are scoped per user and per day; the
/// increment is an atomic upsert so concurrent requests cannot slip past a
/// cap together.
#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "snake_case", type_name = "varchar")]
#[serde(rename_all = "snake_case")]
pub enum UsageKind {
    DocumentUpload,
    ApiCall,
}
