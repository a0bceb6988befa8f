use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::auth::repo_types::User;
use crate::error::ApiError;
use crate::state::AppState;

/// The user behind the request's bearer token. Handlers that take this
/// extractor never run for anonymous requests.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            debug!("missing or malformed Authorization header");
            return Err(ApiError::Unauthenticated);
        };

        match state.accounts.find_user_by_token(token).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                warn!("unknown bearer token");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header. The scheme is
/// matched case-insensitively.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
