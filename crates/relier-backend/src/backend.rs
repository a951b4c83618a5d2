//! End-to-end authentication orchestration.

use crate::config::OidcConfig;
use crate::errors::Result;
use crate::provider::ProviderClient;
use crate::resolver::IdentityResolver;
use crate::store::{Account, UserStore};
use crate::username::UsernameAlgo;
use crate::verify::TokenVerifier;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// The authentication backend: code exchange, token verification,
/// userinfo retrieval and identity resolution composed into one call
///
/// Each [`authenticate`](Self::authenticate) invocation is an independent,
/// stateless unit of work; nothing is shared between attempts beyond the
/// immutable configuration and the user store.
pub struct OidcAuthenticationBackend<S> {
    provider: ProviderClient,
    verifier: TokenVerifier,
    resolver: IdentityResolver<S>,
    store: Arc<S>,
}

impl<S: UserStore> OidcAuthenticationBackend<S> {
    /// Build a backend over `store` from the relying-party configuration
    ///
    /// Fails fast on unusable configuration (bad secret encoding, broken
    /// TLS setup) so per-request paths never see config errors.
    pub fn new(config: &OidcConfig, store: Arc<S>) -> Result<Self> {
        Ok(OidcAuthenticationBackend {
            provider: ProviderClient::new(config)?,
            verifier: TokenVerifier::new(config)?,
            resolver: IdentityResolver::new(Arc::clone(&store), config.create_user),
            store,
        })
    }

    /// Replace the username derivation used when provisioning accounts
    pub fn with_username_algo(mut self, algo: Arc<dyn UsernameAlgo>) -> Self {
        self.resolver = self.resolver.with_username_algo(algo);
        self
    }

    /// Authenticate a callback's `code` and `state`
    ///
    /// `state` is checked for presence only; it is not matched against a
    /// stored value, which leaves the flow without CSRF binding. An empty
    /// `code` or `state` rejects immediately, before any network call.
    ///
    /// The stages run strictly in order: token exchange, ID token
    /// verification, userinfo fetch, identity resolution. The first
    /// failing stage aborts the attempt; verification failures in
    /// particular short-circuit before the userinfo call. No stage is
    /// retried.
    pub async fn authenticate(&self, code: &str, state: &str) -> Result<Option<Account>> {
        if code.is_empty() || state.is_empty() {
            debug!("Callback missing code or state, rejecting before contacting the provider");
            return Ok(None);
        }

        let tokens = self.provider.exchange_code(code).await?;
        let id_token = self.verifier.verify(&tokens.id_token)?;
        debug!(audience = ?id_token.audience, "ID token verified");

        let claims = self.provider.fetch_userinfo(&tokens.access_token).await?;
        self.resolver.resolve(&claims).await
    }

    /// Look up an account by its store id
    pub async fn get_user(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.store.get_by_id(id).await?)
    }
}
