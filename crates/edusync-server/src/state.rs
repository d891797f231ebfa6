//! Application state shared across handlers.

use std::sync::Arc;

use edusync_core::{DocumentStore, HostSchemeResolver};
use edusync_store::Store;

use crate::config::ServerConfig;
use crate::oauth::GithubOAuth;
use crate::session::{MemorySessionBackend, SessionBackend};

/// Application state shared across all handlers.
///
/// Everything in here is read-only after startup, apart from the session
/// backend, which synchronizes internally.
#[derive(Clone)]
pub struct AppState {
    /// Database store.
    store: Arc<Store>,
    /// Server configuration.
    config: Arc<ServerConfig>,
    /// Master description document.
    docs: DocumentStore,
    /// Host/scheme rules for the documentation route.
    resolver: Arc<HostSchemeResolver>,
    sessions: Arc<dyn SessionBackend>,
    oauth: Arc<GithubOAuth>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Store, config: ServerConfig, docs: DocumentStore) -> Self {
        let resolver = HostSchemeResolver::default().with_rules(config.scheme_rules.clone());
        let sessions = MemorySessionBackend::new(config.session_ttl());
        let oauth = GithubOAuth::new(config.github.clone());

        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            docs,
            resolver: Arc::new(resolver),
            sessions: Arc::new(sessions),
            oauth: Arc::new(oauth),
        }
    }

    /// Replace the session backend.
    #[must_use]
    pub fn with_sessions(mut self, sessions: Arc<dyn SessionBackend>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Replace the GitHub OAuth client.
    #[must_use]
    pub fn with_oauth(mut self, oauth: GithubOAuth) -> Self {
        self.oauth = Arc::new(oauth);
        self
    }

    /// Get a reference to the database store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn docs(&self) -> &DocumentStore {
        &self.docs
    }

    pub fn resolver(&self) -> &HostSchemeResolver {
        &self.resolver
    }

    pub fn sessions(&self) -> &dyn SessionBackend {
        self.sessions.as_ref()
    }

    pub fn oauth(&self) -> &GithubOAuth {
        &self.oauth
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
