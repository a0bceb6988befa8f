use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// JSON body that tolerates a missing body and any `Content-Type`.
///
/// An empty body deserializes as `T::default()`. Malformed JSON is a 422 on
/// the `body` field instead of axum's plain-text rejection.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid("body", e.body_text()))?;
        parse_body(&bytes).map(JsonBody)
    }
}

pub(crate) fn parse_body<T>(bytes: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|e| {
        debug!(error = %e, "rejecting malformed JSON body");
        ApiError::invalid("body", "is not valid JSON")
    })
}
