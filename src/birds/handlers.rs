use axum::{extract::State, Json};
use tracing::instrument;

use crate::{birds::Bird, error::ApiResult, state::AppState};

#[instrument(skip(state))]
pub async fn list_birds(State(state): State<AppState>) -> ApiResult<Json<Vec<Bird>>> {
    let birds = state.birds.list_birds().await?;
    Ok(Json(birds))
}
