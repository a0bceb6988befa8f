use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Reference data. Seeded by migration, never written through the API.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Bird {
    pub id: Uuid,
    pub name: String,
    pub species: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: OffsetDateTime,
}
