use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                     // unique user ID
    pub email: String,                // stored exactly as registered
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 hash, not exposed in JSON
    pub created_at: OffsetDateTime,   // creation timestamp
}

/// Opaque bearer token owned by a user. Never expires.
#[derive(Debug, Clone, FromRow)]
pub struct Token {
    pub user_id: Uuid,
    pub token: String,
    pub created_at: OffsetDateTime,
}
