//! The auth collaborator port.

use async_trait::async_trait;
use thiserror::Error;

use sentryops_core::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The session query itself failed.
    #[error("auth collaborator unavailable: {0}")]
    Unavailable(String),

    /// The "get roles for current user" procedure failed.
    #[error("role lookup failed: {0}")]
    RoleLookup(String),
}

/// The collaborator's view of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: UserId,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Change notification from the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthSession),
    SignedOut,
}

/// Session issuance and role lookup, both remote and fallible.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The current session, if one exists.
    async fn session(&self) -> Result<Option<AuthSession>, AuthError>;

    /// Raw role tags of the current user, as the collaborator reports them.
    async fn user_roles(&self) -> Result<Vec<String>, AuthError>;
}
