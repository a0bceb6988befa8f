use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::birds::Bird;

/// One user's record of one bird. `(user_id, bird_id)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Sighting {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bird_id: Uuid,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct SightingBirdRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
    pub bird_id: Uuid,
    pub bird_name: String,
    pub bird_species: Option<String>,
    pub bird_created_at: OffsetDateTime,
}

impl From<SightingBirdRow> for (Sighting, Bird) {
    fn from(r: SightingBirdRow) -> Self {
        (
            Sighting {
                id: r.id,
                user_id: r.user_id,
                bird_id: r.bird_id,
                created_at: r.created_at,
            },
            Bird {
                id: r.bird_id,
                name: r.bird_name,
                species: r.bird_species,
                created_at: r.bird_created_at,
            },
        )
    }
}
