//! Relying-party configuration.
//!
//! Configuration is an explicit struct handed to each component's
//! constructor; nothing reads process-wide settings after startup.
//! [`OidcConfig::from_env`] fails fast, so a misconfigured deployment
//! dies at boot rather than on the first login attempt.

use crate::errors::{BackendError, Result};
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Relying-party settings for one identity provider
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Provider token endpoint (authorization-code exchange)
    pub token_endpoint: String,
    /// Provider userinfo endpoint
    pub userinfo_endpoint: String,
    /// Provider authorization endpoint (browser redirect target)
    pub authorization_endpoint: String,
    /// OAuth client id this relying party was registered with
    pub client_id: String,
    /// OAuth client secret; also the HMAC key for ID token verification
    pub client_secret: String,
    /// Secret is stored base64url-encoded and must be decoded before use
    pub client_secret_encoded: bool,
    /// Absolute URL of our callback endpoint, sent as `redirect_uri`
    pub callback_url: String,
    /// Verify the ID token signature. Disabling this is unsafe and exists
    /// only for parity with providers issuing unsigned tokens in test rigs.
    pub verify_jwt: bool,
    /// Verify the provider's TLS certificate on outbound calls
    pub verify_ssl: bool,
    /// Provision an account on first login when no email match exists
    pub create_user: bool,
    /// Hard timeout applied to each outbound provider call
    pub http_timeout: Duration,
}

impl OidcConfig {
    /// Load configuration from `OIDC_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary settings lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // The initiation view historically used the OP-prefixed client id
        // name; accept both, RP-prefixed wins.
        let client_id = lookup("OIDC_RP_CLIENT_ID")
            .or_else(|| lookup("OIDC_OP_CLIENT_ID"))
            .ok_or(BackendError::ConfigurationMissing("OIDC_RP_CLIENT_ID"))?;

        let timeout_secs = match lookup("OIDC_HTTP_TIMEOUT_SECONDS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| BackendError::ConfigurationInvalid {
                name: "OIDC_HTTP_TIMEOUT_SECONDS",
                message: e.to_string(),
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(OidcConfig {
            token_endpoint: require(&lookup, "OIDC_OP_TOKEN_ENDPOINT")?,
            userinfo_endpoint: require(&lookup, "OIDC_OP_USER_ENDPOINT")?,
            authorization_endpoint: require(&lookup, "OIDC_OP_AUTHORIZATION_ENDPOINT")?,
            client_id,
            client_secret: require(&lookup, "OIDC_RP_CLIENT_SECRET")?,
            client_secret_encoded: flag(&lookup, "OIDC_RP_CLIENT_SECRET_ENCODED", false)?,
            callback_url: require(&lookup, "OIDC_RP_CALLBACK_URL")?,
            verify_jwt: flag(&lookup, "OIDC_VERIFY_JWT", true)?,
            verify_ssl: flag(&lookup, "OIDC_VERIFY_SSL", true)?,
            create_user: flag(&lookup, "OIDC_CREATE_USER", true)?,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<String> {
    lookup(name).ok_or(BackendError::ConfigurationMissing(name))
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: bool,
) -> Result<bool> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(BackendError::ConfigurationInvalid {
                name,
                message: format!("Expected a boolean, got {raw:?}"),
            }),
        },
    }
}
