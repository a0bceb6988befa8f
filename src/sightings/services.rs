use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::birds::Bird;
use crate::db::RepoError;
use crate::error::{ApiError, ApiResult};
use crate::sightings::dto::CreateSightingRequest;
use crate::sightings::repo_types::Sighting;
use crate::state::AppState;

/// Interpret the raw `bird_id` value. Only a UUID string is a usable id.
pub fn parse_bird_id(raw: Option<&Value>) -> ApiResult<Uuid> {
    match raw {
        None | Some(Value::Null) => Err(ApiError::invalid("bird_id", "can't be blank")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ApiError::invalid("bird_id", "can't be blank"))
        }
        Some(Value::String(s)) => {
            Uuid::parse_str(s.trim()).map_err(|_| ApiError::invalid("bird", "must exist"))
        }
        Some(_) => Err(ApiError::invalid("bird", "must exist")),
    }
}

/// Path ids that are not UUIDs can never match a row.
pub fn parse_sighting_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found("sighting"))
}

/// Only the owner may act on a sighting.
pub fn ensure_owner(user: &User, sighting: &Sighting) -> ApiResult<()> {
    if sighting.user_id == user.id {
        Ok(())
    } else {
        Err(ApiError::unauthorized("sighting"))
    }
}

pub async fn create_sighting(
    st: &AppState,
    user: &User,
    req: &CreateSightingRequest,
) -> ApiResult<(Sighting, Bird)> {
    let bird_id = parse_bird_id(req.bird_id.as_ref())?;

    let Some(bird) = st.birds.find_bird(bird_id).await? else {
        return Err(ApiError::invalid("bird", "must exist"));
    };

    // The unique index decides duplicates, so concurrent requests for the
    // same pair cannot both succeed.
    match st.sightings.insert_sighting(user.id, bird.id).await {
        Ok(sighting) => {
            info!(sighting_id = %sighting.id, user_id = %user.id, bird_id = %bird.id, "sighting recorded");
            Ok((sighting, bird))
        }
        Err(RepoError::Duplicate) => Err(ApiError::invalid("bird_id", "has already been taken")),
        Err(RepoError::MissingReference) => Err(ApiError::invalid("bird", "must exist")),
        Err(RepoError::Other(e)) => Err(e.into()),
    }
}

pub async fn delete_sighting(st: &AppState, user: &User, raw_id: &str) -> ApiResult<()> {
    let id = parse_sighting_id(raw_id)?;

    let Some(sighting) = st.sightings.find_sighting(id).await? else {
        return Err(ApiError::not_found("sighting"));
    };

    if let Err(e) = ensure_owner(user, &sighting) {
        warn!(sighting_id = %sighting.id, owner_id = %sighting.user_id, user_id = %user.id, "refusing to delete another user's sighting");
        return Err(e);
    }

    if !st.sightings.delete_sighting(sighting.id, user.id).await? {
        return Err(ApiError::not_found("sighting"));
    }

    info!(sighting_id = %sighting.id, user_id = %user.id, "sighting deleted");
    Ok(())
}

pub async fn list_sightings(st: &AppState, user: &User) -> ApiResult<Vec<(Sighting, Bird)>> {
    Ok(st.sightings.list_for_user(user.id).await?)
}
