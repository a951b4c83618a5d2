//! OpenID Connect relying-party authentication backend.
//!
//! This crate implements the relying-party half of the OIDC Authorization
//! Code flow as a pluggable backend for a user-management layer:
//! - exchange an authorization code for tokens at the provider
//! - validate the returned ID token (signature and audience)
//! - fetch subject claims from the userinfo endpoint
//! - map the claims to a local account, provisioning one when allowed
//!
//! Session establishment, URL routing and account storage are external
//! collaborators reached through narrow traits ([`store::UserStore`],
//! the server crate's session manager).
//!
//! # Security Note
//! Tokens are never persisted. They are obtained once per authentication
//! attempt and discarded after the userinfo fetch. The `state` callback
//! parameter is checked for presence only and is NOT bound to a value
//! issued with the original redirect; deployments needing CSRF binding
//! must layer it on top.

#![warn(missing_docs)]

pub mod backend;
pub mod claims;
pub mod config;
pub mod errors;
pub mod provider;
pub mod redirect;
pub mod resolver;
pub mod store;
pub mod username;
pub mod verify;

// Re-exports
pub use backend::OidcAuthenticationBackend;
pub use claims::{Audience, TokenResponse, UserClaims, VerifiedIdToken};
pub use config::OidcConfig;
pub use errors::{BackendError, Result};
pub use provider::ProviderClient;
pub use redirect::build_authorization_redirect;
pub use resolver::IdentityResolver;
pub use store::{Account, MemoryUserStore, StoreError, UserStore};
pub use username::{HashedUsernameAlgo, UsernameAlgo};
pub use verify::TokenVerifier;
