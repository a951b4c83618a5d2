use crate::config::ServerConfig;
use crate::session::{MemorySessions, SessionManager};
use anyhow::Result;
use relier_backend::{MemoryUserStore, OidcAuthenticationBackend, OidcConfig};
use std::sync::Arc;

/// Shared application state
///
/// The demo binary runs over the in-memory user store; a real deployment
/// swaps in its own `UserStore` implementation when constructing the
/// backend.
pub struct AppState {
    /// Relying-party configuration (needed by the initiation endpoint)
    pub oidc: OidcConfig,
    /// The authentication pipeline
    pub backend: OidcAuthenticationBackend<MemoryUserStore>,
    /// Backing user store, exposed for seeding in tests
    pub store: Arc<MemoryUserStore>,
    /// Session collaborator
    pub sessions: Arc<dyn SessionManager>,
    /// Post-login redirect target
    pub success_url: String,
    /// Failed-login redirect target
    pub failure_url: String,
}

impl AppState {
    /// Build application state from configuration
    pub fn new(oidc: OidcConfig, server: &ServerConfig) -> Result<Self> {
        let store = Arc::new(MemoryUserStore::new());
        let backend = OidcAuthenticationBackend::new(&oidc, Arc::clone(&store))?;

        Ok(AppState {
            oidc,
            backend,
            store,
            sessions: Arc::new(MemorySessions::new()),
            success_url: server.login_redirect_url.clone(),
            failure_url: server.login_redirect_url_failure.clone(),
        })
    }
}
