//! Session establishment collaborator.
//!
//! Session mechanics belong to the surrounding application; the backend
//! only needs a `login` call once an account is resolved. The in-memory
//! implementation backs the demo binary and the tests.

use async_trait::async_trait;
use relier_backend::Account;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Establishes a session for a resolved account
///
/// Called only after a successful, active-account authentication.
#[async_trait]
pub trait SessionManager: Send + Sync {
    /// Establish a session and return its id
    async fn login(&self, account: &Account) -> String;
}

/// In-memory session table
#[derive(Debug, Default)]
pub struct MemorySessions {
    sessions: RwLock<HashMap<String, Uuid>>,
}

impl MemorySessions {
    /// Create an empty session table
    pub fn new() -> Self {
        Self::default()
    }

    /// Account id behind a session, if the session exists
    pub async fn account_id(&self, session_id: &str) -> Option<Uuid> {
        self.sessions.read().await.get(session_id).copied()
    }
}

#[async_trait]
impl SessionManager for MemorySessions {
    async fn login(&self, account: &Account) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), account.id);
        info!(account_id = %account.id, "Session established");
        session_id
    }
}
