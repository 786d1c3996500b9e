//! `sentryops-guard` — per-navigation access decisions.
//!
//! The guard composes the session resolver, the role store, and the route
//! evaluator into one question: "may the current user see this route?" It
//! owns the loading-state lifecycle around that question, including the case
//! where the asking screen goes away before the answer arrives.

pub mod cue;
pub mod guard;

pub use cue::{AccessCue, SilentCue};
pub use guard::{GuardOutcome, RouteGuard};

#[cfg(test)]
mod integration_tests;
