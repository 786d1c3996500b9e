//! `sentryops-branch` — branches, the current-branch selection, and
//! branch-user assignments.
//!
//! The registry owns the process-wide "which branch am I looking at" pointer
//! and its persistence; the assignment store owns the per-branch grant rows
//! the module-action checks run against. Both talk to collaborators through
//! ports defined here, with adapters in `sentryops-infra`.

pub mod assignment;
pub mod branch;
pub mod bus;
pub mod ports;
pub mod registry;

pub use assignment::{AssignmentFilter, AssignmentStore, BranchUser, NewBranchUser};
pub use branch::{Branch, BranchStatus};
pub use bus::{BranchBus, BranchChanged, Subscription};
pub use ports::{DocumentStore, StoreError, UserDirectory, UserProfile};
pub use registry::{BranchNotFoundPolicy, BranchRegistry, RegistryError};
