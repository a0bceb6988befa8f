use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    extractors::JsonBody,
    state::AppState,
};

use super::dto::{CreateSightingRequest, SightingResponse};
use super::services::{create_sighting, delete_sighting, list_sightings};

pub fn sighting_routes() -> Router<AppState> {
    Router::new()
        .route("/sightings", get(list).post(create))
        .route("/sightings/:id", delete(destroy))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<SightingResponse>>> {
    let items = list_sightings(&state, &user)
        .await?
        .into_iter()
        .map(|(sighting, bird)| SightingResponse::new(sighting, bird, user.clone()))
        .collect();
    Ok(Json(items))
}

/// POST /sightings { "bird_id": "<uuid>" }
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(body): JsonBody<CreateSightingRequest>,
) -> ApiResult<(StatusCode, Json<SightingResponse>)> {
    let (sighting, bird) = create_sighting(&state, &user, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(SightingResponse::new(sighting, bird, user)),
    ))
}

/// DELETE /sightings/:id. Any id that cannot name a sighting, including one
/// that does not decode as UTF-8, is a 404 rather than a path rejection.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn destroy(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path.map_err(|e| {
        debug!(error = %e, "undecodable sighting id");
        ApiError::not_found("sighting")
    })?;
    delete_sighting(&state, &user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
