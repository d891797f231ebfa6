//! The documentation route.
//!
//! Every request renders its own snapshot of the master document, with `host`
//! and `schemes` set from that request's `Host` header and protocol. The master
//! itself is never touched after startup.

use std::io;
use std::path::Path;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, header},
    response::Html,
    routing::get,
};
use edusync_core::{ApiDocument, DocumentError, DocumentStore, edusync_document, render_swagger_ui};

use crate::error::ApiResult;
use crate::state::AppState;

/// Header set by the proxy in front of the service.
pub const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Load the master document, falling back to the generated one when the file
/// does not exist.
pub fn load_document_store(path: &Path) -> Result<DocumentStore, DocumentError> {
    match ApiDocument::load(path) {
        Ok(doc) => {
            tracing::info!(path = %path.display(), paths = doc.paths.len(), "Loaded API description");
            Ok(DocumentStore::new(doc))
        }
        Err(DocumentError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(
                path = %path.display(),
                "API description file not found, using the generated document"
            );
            Ok(DocumentStore::new(edusync_document()))
        }
        Err(e) => Err(e),
    }
}

/// Protocol the client used: the first `X-Forwarded-Proto` value, else `http`.
pub fn request_protocol(headers: &HeaderMap) -> String {
    headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "http".to_string())
}

/// The raw `Host` header, or an empty string.
pub fn request_host(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// GET /api-docs/ - Swagger UI for this deployment.
async fn serve_docs(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Html<String>> {
    let protocol = request_protocol(&headers);
    let host = request_host(&headers);

    let origin = state.resolver().resolve(&protocol, host);
    tracing::debug!(%protocol, host, scheme = %origin.scheme, "Serving API docs");

    let mut snapshot = state.docs().snapshot();
    origin.apply(&mut snapshot);

    Ok(Html(render_swagger_ui(&snapshot)?))
}

/// Build documentation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api-docs", get(serve_docs))
        .route("/api-docs/", get(serve_docs))
}
