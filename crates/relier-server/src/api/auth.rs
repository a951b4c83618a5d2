//! Browser-facing OIDC endpoints.

use axum::{
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};
use relier_backend::build_authorization_redirect;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::state::AppState;

/// Query parameters of the provider callback
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

/// GET /oidc/authenticate
///
/// Starts the flow by redirecting the browser to the provider's
/// authorization endpoint.
pub async fn oidc_authenticate(State(state): State<Arc<AppState>>) -> Response {
    match build_authorization_redirect(&state.oidc) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            warn!(error = %e, "Cannot build authorization redirect");
            Redirect::to(&state.failure_url).into_response()
        }
    }
}

/// GET /oidc/callback
///
/// Completes the flow. Every failure mode collapses to a redirect to the
/// failure URL; the distinctions live in the logs.
pub async fn oidc_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    match state.backend.authenticate(&query.code, &query.state).await {
        Ok(Some(account)) if account.active => {
            let session_id = state.sessions.login(&account).await;
            let cookie = format!("relier_session={session_id}; HttpOnly; Path=/");
            ([(SET_COOKIE, cookie)], Redirect::to(&state.success_url)).into_response()
        }
        Ok(Some(account)) => {
            warn!(account_id = %account.id, "Matched account is inactive");
            Redirect::to(&state.failure_url).into_response()
        }
        Ok(None) => {
            debug!("Authentication rejected");
            Redirect::to(&state.failure_url).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Authentication attempt failed");
            Redirect::to(&state.failure_url).into_response()
        }
    }
}
