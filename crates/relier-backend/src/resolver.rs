//! Claims-to-account resolution.

use crate::claims::UserClaims;
use crate::errors::{BackendError, Result};
use crate::store::{Account, UserStore};
use crate::username::{HashedUsernameAlgo, UsernameAlgo};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maps verified claims to a local account
///
/// The decision is a small state machine over the email match count:
/// exactly one match authenticates, more than one is a hard stop, zero
/// matches provisions a new account when creation is enabled.
pub struct IdentityResolver<S> {
    store: Arc<S>,
    username_algo: Arc<dyn UsernameAlgo>,
    create_users: bool,
}

impl<S: UserStore> IdentityResolver<S> {
    /// Create a resolver with the default hash-based username derivation
    pub fn new(store: Arc<S>, create_users: bool) -> Self {
        IdentityResolver {
            store,
            username_algo: Arc::new(HashedUsernameAlgo),
            create_users,
        }
    }

    /// Replace the username derivation strategy
    pub fn with_username_algo(mut self, algo: Arc<dyn UsernameAlgo>) -> Self {
        self.username_algo = algo;
        self
    }

    /// Resolve claims to an account
    ///
    /// `Ok(None)` means the claims carry no usable email; that is a
    /// handled rejection, not an error. Ambiguous and unmatched emails
    /// surface as their own error kinds so operators can tell them apart
    /// in logs.
    pub async fn resolve(&self, claims: &UserClaims) -> Result<Option<Account>> {
        let Some(email) = claims.email() else {
            debug!("Userinfo claims carry no email, rejecting login");
            return Ok(None);
        };

        let mut matches = self.store.find_by_email(email).await?;

        if matches.len() > 1 {
            // Randomly selecting one of several accounts sharing an email
            // would be an identity takeover vector. Always bail.
            warn!(email, count = matches.len(), "Multiple accounts share the claimed email");
            return Err(BackendError::AmbiguousIdentity {
                email: email.to_string(),
            });
        }

        if let Some(account) = matches.pop() {
            debug!(account_id = %account.id, "Claims matched an existing account");
            return Ok(Some(account));
        }

        if !self.create_users {
            debug!(email, "Login failed: no account with this email and account creation is disabled");
            return Err(BackendError::NoSuchIdentity {
                email: email.to_string(),
            });
        }

        let username = self.username_algo.derive(email);
        let account = self.store.create_user(&username, email).await?;
        info!(account_id = %account.id, "Provisioned account on first OIDC login");
        Ok(Some(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryUserStore;
    use serde_json::json;
    use uuid::Uuid;

    fn claims(email: &str) -> UserClaims {
        serde_json::from_value(json!({ "email": email })).unwrap()
    }

    fn seeded(email: &str, username: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            active: true,
        }
    }

    #[tokio::test]
    async fn single_match_authenticates_without_creation() {
        let store = Arc::new(MemoryUserStore::new());
        let existing = seeded("a@example.com", "existing");
        store.insert(existing.clone()).await;

        // create_users=true must not matter when a match exists
        let resolver = IdentityResolver::new(Arc::clone(&store), true);
        let resolved = resolver.resolve(&claims("a@example.com")).await.unwrap();

        assert_eq!(resolved, Some(existing));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn ambiguous_email_is_a_hard_stop() {
        let store = Arc::new(MemoryUserStore::new());
        store.insert(seeded("a@example.com", "first")).await;
        store.insert(seeded("a@example.com", "second")).await;

        let resolver = IdentityResolver::new(Arc::clone(&store), true);
        let err = resolver.resolve(&claims("a@example.com")).await.unwrap_err();

        assert!(matches!(err, BackendError::AmbiguousIdentity { email } if email == "a@example.com"));
        // Creation must never be invoked on ambiguity.
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn zero_matches_provisions_when_enabled() {
        let store = Arc::new(MemoryUserStore::new());
        let resolver = IdentityResolver::new(Arc::clone(&store), true);

        let resolved = resolver
            .resolve(&claims("new@example.com"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resolved.email, "new@example.com");
        assert_eq!(resolved.username, HashedUsernameAlgo.derive("new@example.com"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn zero_matches_rejects_when_creation_disabled() {
        let store = Arc::new(MemoryUserStore::new());
        let resolver = IdentityResolver::new(Arc::clone(&store), false);

        let err = resolver.resolve(&claims("new@example.com")).await.unwrap_err();

        assert!(matches!(err, BackendError::NoSuchIdentity { .. }));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn missing_email_is_a_handled_rejection() {
        let store = Arc::new(MemoryUserStore::new());
        let resolver = IdentityResolver::new(Arc::clone(&store), true);

        let no_email: UserClaims = serde_json::from_value(json!({"sub": "s"})).unwrap();
        assert_eq!(resolver.resolve(&no_email).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn injected_username_algo_is_used_for_provisioning() {
        struct Fixed;
        impl UsernameAlgo for Fixed {
            fn derive(&self, _email: &str) -> String {
                "fixed-name".to_string()
            }
        }

        let store = Arc::new(MemoryUserStore::new());
        let resolver =
            IdentityResolver::new(Arc::clone(&store), true).with_username_algo(Arc::new(Fixed));

        let resolved = resolver
            .resolve(&claims("x@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.username, "fixed-name");
    }
}
