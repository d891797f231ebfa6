//! Login state, GitHub OAuth and bearer token endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{AuthSource, AuthenticatedUser, create_token};
use crate::error::{ApiError, ApiResult};
use crate::session::{SESSION_COOKIE, Session, SessionContext, SessionId};
use crate::state::AppState;

/// Message returned when the session cannot be torn down.
pub const LOGOUT_ERROR: &str = "Error logging out.";

/// Query string GitHub sends to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Response for token issuance.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_in_hours: u64,
}

/// GET / - Current login state.
async fn index(session: SessionContext) -> String {
    match session.user() {
        Some(user) => format!("Logged in as {}", user.display_name()),
        None => "Logged Out".to_string(),
    }
}

/// GET /github - Start the GitHub login.
async fn github_login(State(state): State<AppState>) -> ApiResult<Redirect> {
    let url = state
        .oauth()
        .authorize_url()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Redirect::to(url.as_str()))
}

/// GET /github/callback - Finish the GitHub login.
///
/// Always redirects to `/`. A session is only established when GitHub vouches
/// for the user.
async fn github_callback(
    State(state): State<AppState>,
    session: SessionContext,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    let home = Redirect::to("/");

    if let Some(error) = params.error {
        tracing::warn!(%error, "GitHub declined the login");
        return home.into_response();
    }
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        tracing::warn!("OAuth callback without a code");
        return home.into_response();
    };

    let user = match state.oauth().complete_login(&code).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "GitHub login failed");
            return home.into_response();
        }
    };

    // A login always starts a fresh session.
    if let Some(previous) = session.id {
        if let Err(e) = state.sessions().destroy(previous).await {
            tracing::warn!(error = %e, session_id = %previous, "Failed to drop previous session");
        }
    }

    let id = SessionId::new();
    let login = user.login.clone();
    if let Err(e) = state.sessions().save(id, Session::for_user(user)).await {
        tracing::error!(error = %e, "Failed to store session");
        return home.into_response();
    }
    tracing::info!(%login, "User logged in");

    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), home).into_response()
}

/// GET /logout - End the session.
async fn logout(State(state): State<AppState>, session: SessionContext, jar: CookieJar) -> Response {
    if let Some(id) = session.id {
        if let Err(e) = state.sessions().destroy(id).await {
            tracing::error!(error = %e, session_id = %id, "Logout failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": LOGOUT_ERROR })),
            )
                .into_response();
        }
        tracing::info!(session_id = %id, "Session ended");
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/")).into_response()
}

/// GET /auth/token - Issue a bearer token to a logged-in user.
async fn issue_token(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> ApiResult<Json<TokenResponse>> {
    if identity.source != AuthSource::Session {
        return Err(ApiError::Unauthorized(
            "tokens are issued to logged-in sessions only".to_string(),
        ));
    }

    let config = state.config();
    let token = create_token(&identity, &config.session_secret, config.token_expiry_hours)?;
    tracing::info!(login = %identity.login, "Issued bearer token");

    Ok(Json(TokenResponse {
        token,
        expires_in_hours: config.token_expiry_hours,
    }))
}

/// Build session and OAuth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/github", get(github_login))
        .route("/github/callback", get(github_callback))
        .route("/logout", get(logout))
        .route("/auth/token", get(issue_token))
}
