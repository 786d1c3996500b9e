//! `sentryops-auth` — pure authorization vocabulary and decision functions.
//!
//! This crate is intentionally decoupled from IO: it knows nothing about the
//! auth collaborator, persistence, or rendering. It defines the role and
//! action vocabularies, module grants, the static route table, and the two
//! evaluator functions that every access decision in the back office goes
//! through.

pub mod action;
pub mod evaluate;
pub mod grant;
pub mod policy;
pub mod role;
pub mod routes;

pub use action::Action;
pub use evaluate::{can_access_route, can_perform};
pub use grant::{derived_roles, role_tag_for_module, ModuleGrant, ModuleGrantForm};
pub use policy::AccessPolicy;
pub use role::Role;
pub use routes::{RouteRule, RouteTable};
