//! Username derivation for provisioned accounts.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Strategy for deriving a stored username from a claimed email
///
/// Must be deterministic: the same email always yields the same username,
/// so repeated first logins cannot fan out into duplicate accounts.
pub trait UsernameAlgo: Send + Sync {
    /// Derive the username for `email`
    fn derive(&self, email: &str) -> String;
}

/// Default derivation: base64url-encoded SHA-256 digest of the email,
/// padding stripped
///
/// Usernames are often treated as public identifiers, so the stored value
/// must not leak the email address; a one-way digest is deterministic
/// without being reversible.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashedUsernameAlgo;

impl UsernameAlgo for HashedUsernameAlgo {
    fn derive(&self, email: &str) -> String {
        let digest = Sha256::digest(email.as_bytes());
        URL_SAFE_NO_PAD.encode(digest)
    }
}
