//! HTTP surface for the relier authentication backend.
//!
//! Exposes the two browser-facing endpoints of the Authorization Code
//! flow: an initiation endpoint that redirects to the identity provider
//! and a callback endpoint that completes the login and redirects to the
//! configured success or failure URL.

pub mod api;
pub mod config;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use session::{MemorySessions, SessionManager};
pub use state::AppState;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

/// Build the application router
///
/// Both OIDC endpoints accept GET only; axum answers other methods with
/// 405 Method Not Allowed.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health::health_check))
        .route("/oidc/authenticate", get(api::auth::oidc_authenticate))
        .route("/oidc/callback", get(api::auth::oidc_callback))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(state)
}
