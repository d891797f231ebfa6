//! edusync-server: HTTP API gateway for EduSync
//!
//! This crate provides:
//! - The documentation route, serving Swagger UI with per-request host and scheme
//! - GitHub OAuth login with server-side sessions and bearer tokens
//! - CRUD routes over the students, users, courses and enrollments collections
//! - Health and readiness checks
//!
//! # Architecture
//!
//! Every request passes through a fixed [`pipeline::GatewayPipeline`]:
//! tracing and request ids, body limits, session attachment, identity
//! resolution and CORS headers, in that order, before route dispatch.
//!
//! # Usage
//!
//! ```rust,ignore
//! use edusync_server::{build_app, AppState, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let docs = edusync_server::routes::docs::load_document_store(&config.docs_path)?;
//! let state = AppState::new(store, config, docs);
//! axum::serve(listener, build_app(state)).await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod oauth;
pub mod pipeline;
pub mod routes;
pub mod session;
pub mod state;

use axum::Router;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use pipeline::{GatewayPipeline, Stage};
pub use state::AppState;

// Re-export dependent crates
pub use edusync_core;
pub use edusync_store;

/// Build the router for `state` wrapped in the gateway pipeline.
pub fn build_app(state: AppState) -> Router {
    let pipeline = GatewayPipeline::from_config(state.config());
    pipeline.apply(routes::build_router(state.clone()), &state)
}
