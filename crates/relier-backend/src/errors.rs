//! Backend error types.

use crate::store::StoreError;
use thiserror::Error;

/// Authentication backend errors
///
/// Every per-request failure collapses to a single user-visible outcome
/// (redirect to the failure URL); the distinctions below exist for
/// operators reading logs. Configuration errors are raised at component
/// construction and are not recoverable per-request.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Required setting absent
    #[error("Missing required setting: {0}")]
    ConfigurationMissing(&'static str),

    /// Setting present but unusable
    #[error("Invalid setting {name}: {message}")]
    ConfigurationInvalid {
        /// Name of the offending setting
        name: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// Non-2xx response or network failure talking to the identity provider
    #[error("Identity provider error: {0}")]
    Upstream(String),

    /// ID token failed signature, audience, expiry or format checks
    #[error("Invalid ID token: {0}")]
    InvalidToken(String),

    /// Multiple local accounts share the claimed email
    ///
    /// Silently picking one of several accounts sharing an email is an
    /// identity risk, so this is always a hard stop.
    #[error("Multiple accounts registered for email {email}")]
    AmbiguousIdentity {
        /// The ambiguous email address
        email: String,
    },

    /// No account matches the claimed email and creation is disabled
    #[error("No account for email {email} and account creation is disabled")]
    NoSuchIdentity {
        /// The unmatched email address
        email: String,
    },

    /// User store error
    #[error("User store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;
