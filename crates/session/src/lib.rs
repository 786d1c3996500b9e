//! `sentryops-session` — who is signed in, and what is their primary role.
//!
//! Wraps the opaque auth collaborator behind the [`AuthProvider`] port and
//! layers two things on top: the fail-closed [`SessionResolver`] and the
//! [`RoleStore`] with its user-keyed local cache.

pub mod provider;
pub mod resolver;
pub mod role_store;

pub use provider::{AuthError, AuthEvent, AuthProvider, AuthSession};
pub use resolver::{Session, SessionResolver};
pub use role_store::RoleStore;
