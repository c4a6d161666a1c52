use serde::{Deserialize, Serialize};

/// Account profile resolved from the external auth service.
/// Identity is owned there; this service only consumes the claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub email_confirmed: bool,
}
