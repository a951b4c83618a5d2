//! Wire types for the token exchange and userinfo responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token endpoint response for the authorization-code grant
///
/// Transient: used once per authentication attempt, never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Signed ID token asserting the authenticated user's identity
    pub id_token: String,
    /// Bearer token for the userinfo endpoint
    pub access_token: String,
}

/// JWT `aud` claim, which OIDC allows as a string or an array of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// Single audience
    One(String),
    /// Multiple audiences
    Many(Vec<String>),
}

impl Audience {
    /// All audience values, regardless of wire shape
    pub fn values(&self) -> &[String] {
        match self {
            Audience::One(aud) => std::slice::from_ref(aud),
            Audience::Many(auds) => auds,
        }
    }
}

/// Decoded, signature-checked ID token payload
///
/// Created per authentication attempt and discarded after use.
#[derive(Debug, Clone)]
pub struct VerifiedIdToken {
    /// The `aud` claim the token was verified against
    pub audience: Audience,
    /// Remaining payload claims
    pub claims: Map<String, Value>,
}

/// Subject claims returned by the provider's userinfo endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserClaims(Map<String, Value>);

impl UserClaims {
    /// The `email` claim, if present and non-empty
    ///
    /// Email is the only claim this backend keys on; its absence is a
    /// handled rejection, not an error.
    pub fn email(&self) -> Option<&str> {
        self.0
            .get("email")
            .and_then(Value::as_str)
            .filter(|email| !email.is_empty())
    }

    /// Look up an arbitrary claim
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}
