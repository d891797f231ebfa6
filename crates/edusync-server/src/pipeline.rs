//! The gateway pipeline: a fixed, ordered list of request interceptors.
//!
//! Stages are listed outermost first. A request passes through them left to
//! right before route dispatch, and the response passes back right to left.
//! The list is built once at startup and applied to the router in one place.
//!
//! | Stage         | Effect                                                        |
//! |---------------|---------------------------------------------------------------|
//! | `Trace`       | per-request span, `x-request-id` generated and echoed         |
//! | `BodyParsing` | request body limit enforced by the `Json` extractors          |
//! | `Session`     | `edusync.sid` cookie resolved into a `SessionContext`         |
//! | `Identity`    | session user or bearer token resolved into an `Identity`      |
//! | `Cors`        | permissive CORS headers on every response, preflights end here |

use std::fmt;

use axum::{Router, extract::DefaultBodyLimit, middleware};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::middleware::{
    cors::apply_cors_headers,
    identity::resolve_identity,
    request_id::{propagate_request_id, request_id_layer},
    session::attach_session,
};
use crate::state::AppState;

/// One interceptor of the gateway pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Trace,
    BodyParsing,
    Session,
    Identity,
    Cors,
}

impl Stage {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::BodyParsing => "body-parsing",
            Self::Session => "session",
            Self::Identity => "identity",
            Self::Cors => "cors",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stage order, outermost first.
const STAGES: [Stage; 5] = [
    Stage::Trace,
    Stage::BodyParsing,
    Stage::Session,
    Stage::Identity,
    Stage::Cors,
];

/// The immutable interceptor chain placed in front of the router.
#[derive(Debug, Clone)]
pub struct GatewayPipeline {
    stages: Vec<Stage>,
    max_body_bytes: usize,
}

impl GatewayPipeline {
    pub fn new(max_body_bytes: usize) -> Self {
        Self {
            stages: STAGES.to_vec(),
            max_body_bytes,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.max_body_bytes)
    }

    /// Stages in request order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Stage names joined in request order, e.g. `trace > body-parsing > ...`.
    pub fn describe(&self) -> String {
        self.stages
            .iter()
            .map(|stage| stage.name())
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Wrap `router` in every stage.
    ///
    /// Each `layer` call wraps everything added before it, so stages are added
    /// innermost first.
    pub fn apply(&self, router: Router, state: &AppState) -> Router {
        let router = self
            .stages
            .iter()
            .rev()
            .fold(router, |router, &stage| self.layer(router, stage, state));

        tracing::debug!(stages = %self.describe(), "Gateway pipeline assembled");
        router
    }

    fn layer(&self, router: Router, stage: Stage, state: &AppState) -> Router {
        match stage {
            Stage::Trace => router
                .layer(middleware::from_fn(propagate_request_id))
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http()),
            Stage::BodyParsing => router.layer(DefaultBodyLimit::max(self.max_body_bytes)),
            Stage::Session => {
                router.layer(middleware::from_fn_with_state(state.clone(), attach_session))
            }
            Stage::Identity => {
                router.layer(middleware::from_fn_with_state(state.clone(), resolve_identity))
            }
            Stage::Cors => router.layer(middleware::from_fn(apply_cors_headers)),
        }
    }
}
