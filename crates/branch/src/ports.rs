//! Collaborator ports for remote persistence and the user directory.
//!
//! The real deployment talks to a managed document database; tests and local
//! composition use the in-memory adapters from `sentryops-infra`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sentryops_core::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A read against the remote store failed.
    #[error("read failed: {0}")]
    Read(String),

    /// A write against the remote store was rejected or lost.
    #[error("write failed: {0}")]
    Write(String),

    /// A stored document could not be decoded.
    #[error("corrupt document in '{collection}': {message}")]
    Corrupt { collection: String, message: String },
}

/// Remote document store: named collections of JSON documents.
///
/// Writes report success or failure once; they are not retried here — the
/// caller surfaces the failure to the operator (fail loud).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, collection: &str) -> Result<Vec<serde_json::Value>, StoreError>;

    async fn insert(
        &self,
        collection: &str,
        id: &str,
        document: serde_json::Value,
    ) -> Result<(), StoreError>;
}

/// Directory profile of a back-office user, for display and text search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Lookup into the user directory collaborator.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError>;
}
