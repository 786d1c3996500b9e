//! Static route access rules.

use serde::{Deserialize, Serialize};

use crate::Role;

/// Landing route unauthenticated and denied users are sent to.
///
/// There is no dedicated "access denied" page; denial redirects here. That is
/// a deliberate simplification carried over from the shipped product.
pub const LANDING_ROUTE: &str = "/";

/// Access rule for a single route.
///
/// An empty `allowed_roles` list means "any authenticated user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    pub path: String,
    pub allowed_roles: Vec<Role>,
}

impl RouteRule {
    pub fn new(path: impl Into<String>, allowed_roles: Vec<Role>) -> Self {
        Self {
            path: path.into(),
            allowed_roles,
        }
    }

    /// Rule for a route open to every authenticated user.
    pub fn open(path: impl Into<String>) -> Self {
        Self::new(path, vec![])
    }
}

/// The application's route table, assembled once at composition time.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// The back-office module routes and their allowed roles.
    pub fn back_office() -> Self {
        use Role::*;
        Self::new(vec![
            RouteRule::open("/dashboard"),
            RouteRule::new("/sales", vec![Admin, Sales]),
            RouteRule::new("/operations", vec![Admin, Operations]),
            RouteRule::new("/accounts", vec![Admin, Accounts]),
            RouteRule::new("/hr", vec![Admin, Hr]),
            RouteRule::new("/office-admin", vec![Admin]),
            RouteRule::new("/reports", vec![Admin, Reports]),
            RouteRule::open("/profile"),
        ])
    }

    pub fn rule(&self, path: &str) -> Option<&RouteRule> {
        self.rules.iter().find(|r| r.path == path)
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }
}
