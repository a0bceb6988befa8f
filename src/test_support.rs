//! Helpers for driving the full router against the in-memory store.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::app::build_app;
use crate::auth::repo_types::User;
use crate::auth::services::{generate_token, hash_password};
use crate::auth::repo::AccountRepo;
use crate::memory::MemoryStore;
use crate::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub struct Response {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub raw: Vec<u8>,
}

impl Response {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.raw).expect("response body is JSON")
    }
}

impl TestApp {
    pub fn new() -> Self {
        let (state, store) = AppState::fake();
        Self {
            router: build_app(state),
            store,
        }
    }

    /// A registered user plus a token that authenticates as them. Skips the
    /// HTTP login so tests stay focused on the endpoint under test.
    pub async fn user_with_token(&self, email: &str) -> (User, String) {
        let hash = hash_password("password123").expect("hash");
        let user = self.store.create_user(email, &hash).await.expect("create user");
        let token = self
            .store
            .create_token(user.id, &generate_token())
            .await
            .expect("create token");
        (user, token.token)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let res = self
            .router
            .clone()
            .oneshot(req.body(body).expect("request"))
            .await
            .expect("router is infallible");

        let status = res.status();
        let headers = res.headers().clone();
        let raw = to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("body")
            .to_vec();
        Response {
            status,
            headers,
            raw,
        }
    }
}
