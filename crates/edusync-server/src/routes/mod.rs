//! Route definitions for the HTTP API.

pub mod auth;
pub mod docs;
pub mod health;
pub mod records;

use axum::{Router, http::Uri};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(docs::routes())
        .merge(auth::routes())
        .merge(records::routes())
        .fallback(not_found)
        .with_state(state)
}

/// JSON 404 for unrouted paths.
async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
