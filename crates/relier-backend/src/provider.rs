//! Outbound HTTP calls to the identity provider.

use crate::claims::{TokenResponse, UserClaims};
use crate::config::OidcConfig;
use crate::errors::{BackendError, Result};
use tracing::debug;

/// HTTP client for the provider's token and userinfo endpoints
///
/// Two outbound calls per authentication attempt, no retries: a transient
/// upstream failure is a failed login attempt. Every call runs under the
/// configured hard timeout, and TLS verification follows `verify_ssl`.
pub struct ProviderClient {
    http: reqwest::Client,
    token_endpoint: String,
    userinfo_endpoint: String,
    client_id: String,
    client_secret: String,
    callback_url: String,
}

impl ProviderClient {
    /// Build a client from the relying-party configuration
    pub fn new(config: &OidcConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| BackendError::Upstream(format!("Failed to build HTTP client: {e}")))?;

        Ok(ProviderClient {
            http,
            token_endpoint: config.token_endpoint.clone(),
            userinfo_endpoint: config.userinfo_endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            callback_url: config.callback_url.clone(),
        })
    }

    /// Exchange an authorization code for tokens at the token endpoint
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let params: [(&str, &str); 5] = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.callback_url),
        ];

        debug!(endpoint = %self.token_endpoint, "Exchanging authorization code");
        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| BackendError::Upstream(format!("Token exchange failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Upstream(format!(
                "Token exchange failed with status {status}: {body}"
            )));
        }

        response.json::<TokenResponse>().await.map_err(|e| {
            BackendError::Upstream(format!("Failed to parse token response: {e}"))
        })
    }

    /// Fetch subject claims from the userinfo endpoint
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<UserClaims> {
        debug!(endpoint = %self.userinfo_endpoint, "Fetching userinfo");
        let response = self
            .http
            .get(&self.userinfo_endpoint)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| BackendError::Upstream(format!("Userinfo request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Upstream(format!(
                "Userinfo request failed with status {status}: {body}"
            )));
        }

        response.json::<UserClaims>().await.map_err(|e| {
            BackendError::Upstream(format!("Failed to parse userinfo response: {e}"))
        })
    }
}
