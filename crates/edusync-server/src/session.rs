//! Server-side sessions keyed by the `edusync.sid` cookie.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::oauth::GithubUser;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "edusync.sid";

/// Opaque session identifier carried in the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Data kept for one user agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// GitHub identity established by the OAuth callback.
    pub user: Option<GithubUser>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn for_user(user: GithubUser) -> Self {
        Self {
            user: Some(user),
            created_at: Utc::now(),
        }
    }
}

/// Session backend errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session backend unavailable: {0}")]
    Unavailable(String),
}

/// Storage for sessions.
#[async_trait]
pub trait SessionBackend: Send + Sync + fmt::Debug {
    /// Load a live session. Expired or unknown ids yield `None`.
    async fn load(&self, id: SessionId) -> Result<Option<Session>, SessionError>;

    async fn save(&self, id: SessionId, session: Session) -> Result<(), SessionError>;

    async fn destroy(&self, id: SessionId) -> Result<(), SessionError>;
}

/// In-process session backend with a fixed time-to-live.
#[derive(Debug)]
pub struct MemorySessionBackend {
    sessions: RwLock<HashMap<SessionId, Session>>,
    ttl: Duration,
}

impl MemorySessionBackend {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of stored sessions, expired ones not yet pruned included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now - session.created_at > self.ttl
    }
}

#[async_trait]
impl SessionBackend for MemorySessionBackend {
    async fn load(&self, id: SessionId) -> Result<Option<Session>, SessionError> {
        let session = self.sessions.read().await.get(&id).cloned();
        match session {
            Some(session) if self.is_expired(&session, Utc::now()) => {
                self.sessions.write().await.remove(&id);
                tracing::debug!(session_id = %id, "Session expired");
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Stores `session` and prunes every expired entry.
    async fn save(&self, id: SessionId, session: Session) -> Result<(), SessionError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, stored| !self.is_expired(stored, now));
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Pruned expired sessions");
        }
        sessions.insert(id, session);
        Ok(())
    }

    async fn destroy(&self, id: SessionId) -> Result<(), SessionError> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }
}

/// The session attached to the current request by the session middleware.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Id from the request cookie, if it named a live session.
    pub id: Option<SessionId>,
    pub session: Option<Session>,
}

impl SessionContext {
    pub fn user(&self) -> Option<&GithubUser> {
        self.session.as_ref().and_then(|s| s.user.as_ref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .unwrap_or_default())
    }
}
