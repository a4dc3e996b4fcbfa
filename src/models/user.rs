use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Role;

/// A portal account. `role` decides which side of the portal the
/// account sees: patients submit reports, doctors review them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// PBKDF2 hash in the portal's `pbkdf2-sha256$...` encoding.
    /// Never serialized into API responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub full_name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}
