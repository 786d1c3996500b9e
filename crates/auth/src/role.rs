use core::str::FromStr;

use serde::{Deserialize, Serialize};

use sentryops_core::DomainError;

/// Primary role of a back-office user.
///
/// The vocabulary is closed: one tag per department module plus `admin`.
/// `Admin` is a super-role at the route layer (see [`crate::AccessPolicy`]);
/// it carries no implicit grant at the module-action layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Sales,
    Operations,
    Accounts,
    Hr,
    OfficeAdmin,
    Reports,
}

impl Role {
    /// All roles, in a stable order (used by admin screens and tests).
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Sales,
        Role::Operations,
        Role::Accounts,
        Role::Hr,
        Role::OfficeAdmin,
        Role::Reports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Sales => "sales",
            Role::Operations => "operations",
            Role::Accounts => "accounts",
            Role::Hr => "hr",
            Role::OfficeAdmin => "office_admin",
            Role::Reports => "reports",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Pick the primary role out of a raw tag list returned by the role RPC.
    ///
    /// `admin` wins if present anywhere; otherwise the first recognizable tag
    /// is taken; an empty or unrecognizable list yields `None`.
    pub fn select_primary(tags: &[String]) -> Option<Role> {
        if tags.iter().any(|t| t == "admin") {
            return Some(Role::Admin);
        }
        tags.iter().find_map(|t| t.parse().ok())
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "sales" => Ok(Role::Sales),
            "operations" => Ok(Role::Operations),
            "accounts" => Ok(Role::Accounts),
            "hr" => Ok(Role::Hr),
            "office_admin" => Ok(Role::OfficeAdmin),
            "reports" => Ok(Role::Reports),
            other => Err(DomainError::validation(format!("unknown role '{other}'"))),
        }
    }
}
