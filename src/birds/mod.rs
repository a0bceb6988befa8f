use crate::state::AppState;
use axum::{routing::get, Router};

pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use repo::BirdRepo;
pub use repo_types::Bird;

pub fn router() -> Router<AppState> {
    Router::new().route("/birds", get(handlers::list_birds))
}
