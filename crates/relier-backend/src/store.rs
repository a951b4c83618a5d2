//! User-store collaborator seam.
//!
//! Account storage is owned by the surrounding application; this backend
//! only needs email lookup, creation and id lookup. The trait keeps the
//! pipeline testable and lets deployments plug in their real database.
//! Uniqueness races on concurrent creation for the same email are the
//! store's responsibility, not this crate's.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// User store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage failure
    #[error("Storage error: {0}")]
    Backend(String),

    /// Username already taken
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),
}

/// A local user account
///
/// Treated as opaque apart from the email used for matching and the
/// active flag checked before session establishment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned account id
    pub id: Uuid,
    /// Stored username (derived, not the email)
    pub username: String,
    /// Email address the account is keyed on
    pub email: String,
    /// Whether the account may log in
    pub active: bool,
}

/// External user-store interface
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All accounts whose email equals `email`
    ///
    /// Order is irrelevant but the count must be precise; the resolver's
    /// disambiguation policy depends on it.
    async fn find_by_email(&self, email: &str) -> Result<Vec<Account>, StoreError>;

    /// Create an account; the single atomic mutation in the login path
    async fn create_user(&self, username: &str, email: &str) -> Result<Account, StoreError>;

    /// Look up an account by id
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;
}

/// In-memory user store for tests and the demo server
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    accounts: RwLock<Vec<Account>>,
}

impl MemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account directly, bypassing the creation path
    pub async fn insert(&self, account: Account) {
        self.accounts.write().await.push(account);
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Whether the store holds no accounts
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Vec<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .filter(|account| account.email == email)
            .cloned()
            .collect())
    }

    async fn create_user(&self, username: &str, email: &str) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|account| account.username == username) {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }
        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            active: true,
        };
        accounts.push(account.clone());
        Ok(account)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().find(|account| account.id == id).cloned())
    }
}
