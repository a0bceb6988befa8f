use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{repo_types::User, PublicUser};
use crate::birds::Bird;
use crate::sightings::repo_types::Sighting;

/// Body of `POST /sightings`. `bird_id` stays untyped so that a missing,
/// null or garbage value can be told apart and reported as a field error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSightingRequest {
    #[serde(default)]
    pub bird_id: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SightingResponse {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub bird: Bird,
    pub user: PublicUser,
}

impl SightingResponse {
    pub fn new(sighting: Sighting, bird: Bird, user: User) -> Self {
        Self {
            id: sighting.id,
            created_at: sighting.created_at,
            bird,
            user: user.into(),
        }
    }
}
