//! Identity resolution from the session or a bearer token.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::auth::{Identity, validate_token};
use crate::session::SessionContext;
use crate::state::AppState;

/// Attach an [`Identity`] when the caller is logged in or presents a valid
/// bearer token. The session takes precedence.
///
/// Requests without an identity continue unchanged; routes that need one reject
/// them through the `AuthenticatedUser` extractor.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let from_session = request
        .extensions()
        .get::<SessionContext>()
        .and_then(SessionContext::user)
        .map(Identity::from_session_user);

    let identity = from_session.or_else(|| {
        let token = bearer_token(&request)?;
        match validate_token(token, &state.config().session_secret) {
            Ok(claims) => Some(Identity::from_claims(claims)),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring bearer token");
                None
            }
        }
    });

    if let Some(identity) = identity {
        tracing::debug!(login = %identity.login, source = ?identity.source, "Resolved identity");
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<&str> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|t| !t.is_empty())
}
