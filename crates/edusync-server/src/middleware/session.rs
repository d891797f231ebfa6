//! Session attachment.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::session::{SESSION_COOKIE, SessionContext, SessionId};
use crate::state::AppState;

/// Look up the session named by the `edusync.sid` cookie and attach it to the
/// request as a [`SessionContext`].
///
/// Unknown, expired or malformed ids attach an empty context. A failing backend
/// is logged and treated the same way; it never terminates the request.
pub async fn attach_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let id = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse::<SessionId>().ok());

    let context = match id {
        Some(id) => match state.sessions().load(id).await {
            Ok(Some(session)) => SessionContext {
                id: Some(id),
                session: Some(session),
            },
            Ok(None) => SessionContext::default(),
            Err(e) => {
                tracing::warn!(error = %e, session_id = %id, "Session lookup failed");
                SessionContext::default()
            }
        },
        None => SessionContext::default(),
    };

    request.extensions_mut().insert(context);
    next.run(request).await
}
