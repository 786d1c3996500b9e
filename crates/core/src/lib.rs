//! `sentryops-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns)
//! shared by the access-control and branch-scoping crates.

pub mod error;
pub mod id;
pub mod kv;

pub use error::{DomainError, DomainResult};
pub use id::{AssignmentId, BranchId, UserId};
pub use kv::{keys, KvStore};
