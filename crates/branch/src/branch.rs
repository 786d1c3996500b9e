use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sentryops_core::{BranchId, UserId};

/// Lifecycle status of a branch.
///
/// Branches are never hard-deleted; retiring one flips it to `Inactive`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchStatus {
    Active,
    Inactive,
}

/// A company branch office.
///
/// Serialized field names are camelCase because persisted branch lists from
/// the original deployment are camelCase JSON and must keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub code: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub phone: String,
    pub email: String,
    pub manager_name: String,
    pub manager_id: Option<UserId>,
    pub status: BranchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Branch {
    /// The default HQ branch a fresh deployment is seeded with.
    pub fn main_seed(now: DateTime<Utc>) -> Self {
        Self {
            id: BranchId::main(),
            name: "Head Office".to_string(),
            code: "HQ".to_string(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            postal_code: String::new(),
            phone: String::new(),
            email: String::new(),
            manager_name: String::new(),
            manager_id: None,
            status: BranchStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_main(&self) -> bool {
        self.id.is_main()
    }

    pub fn is_active(&self) -> bool {
        self.status == BranchStatus::Active
    }
}
