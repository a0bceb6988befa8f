//! Error type shared by all handlers.
//!
//! Every failure is rendered as `{"errors": {...}}` with a status code that
//! matches its kind, so handlers can use `?` and never build error bodies by
//! hand.

use std::collections::BTreeMap;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

/// Validation messages keyed by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation error.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token, or a token that matches no user.
    #[error("authentication required")]
    Unauthenticated,

    /// Identity is known but the action is not allowed for it.
    #[error("{resource}: unauthorized")]
    Unauthorized { resource: &'static str },

    #[error("{resource}: not found")]
    NotFound { resource: &'static str },

    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn unauthorized(resource: &'static str) -> Self {
        ApiError::Unauthorized { resource }
    }

    pub fn not_found(resource: &'static str) -> Self {
        ApiError::NotFound { resource }
    }

    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation(FieldErrors::single(field, message))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated | ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            ApiError::Unauthenticated => json!({ "errors": { "token": "Unauthenticated" } }),
            ApiError::Unauthorized { resource } => {
                json!({ "errors": { *resource: "Unauthorized" } })
            }
            ApiError::NotFound { resource } => json!({ "errors": { *resource: "Not found" } }),
            ApiError::Validation(fields) => json!({ "errors": fields }),
            ApiError::Internal(_) => json!({ "errors": { "server": "Internal server error" } }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            error!(error = ?e, "internal error");
        }

        let status = self.status();
        let body = Json(self.body());

        match self {
            ApiError::Unauthenticated => {
                (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
