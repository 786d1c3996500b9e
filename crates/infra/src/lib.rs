//! `sentryops-infra` — in-memory adapters for the collaborator ports.
//!
//! The real deployment plugs a managed auth service, a document database and
//! browser storage into these ports; this crate provides the in-memory
//! stand-ins used by composition roots, demos and tests.

pub mod auth;
pub mod directory;
pub mod documents;
pub mod kv;

pub use auth::StaticAuthProvider;
pub use directory::InMemoryDirectory;
pub use documents::InMemoryDocumentStore;
pub use kv::InMemoryKv;
