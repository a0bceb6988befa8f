use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{PublicUser, RegisterRequest, TokenRequest, TokenResponse},
        extractors::AuthUser,
        services::{issue_token, register_user},
    },
    error::ApiResult,
    extractors::JsonBody,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/tokens", post(create_token))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/user", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<PublicUser>)> {
    let user = register_user(state.accounts.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn create_token(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<TokenRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let (token, user) = issue_token(state.accounts.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(TokenResponse::new(token, user))))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(user.into())
}

#[cfg(test)]
mod me_tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn test_me_response_serialization() {
        let response = PublicUser {
            id: uuid::Uuid::new_v4(),
            email: "test@example.com".to_string(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("1970-01-01T00:00:00Z"));
        assert!(!json.contains("password"));
    }
}
