//! Branch-user assignments: who holds which module grants at which branch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use sentryops_auth::{can_perform, derived_roles, AccessPolicy, Action, ModuleGrant, ModuleGrantForm, Role};
use sentryops_core::{AssignmentId, BranchId, UserId};

use crate::ports::{DocumentStore, StoreError, UserDirectory};
use crate::BranchRegistry;

/// Collection the assignment rows live in (legacy name, keep as-is).
pub const COLLECTION: &str = "branchUsers";

/// One user's standing at one branch.
///
/// Note there is no `roles` field: role tags are derived from the grants and
/// the manager flag on demand ([`BranchUser::roles`]), so they cannot drift
/// from the grants the way an independently stored copy would.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchUser {
    pub id: AssignmentId,
    pub user_id: UserId,
    pub branch_id: BranchId,
    pub permissions: Vec<ModuleGrant>,
    pub is_manager: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BranchUser {
    /// Role tags implied by this assignment.
    pub fn roles(&self) -> Vec<String> {
        derived_roles(&self.permissions, self.is_manager)
    }

    /// May this assignment perform `action` on `module`?
    pub fn can(
        &self,
        role: Option<Role>,
        module: &str,
        action: Action,
        policy: &AccessPolicy,
    ) -> bool {
        can_perform(role, Some(&self.permissions), module, action, policy)
    }
}

/// Input for creating an assignment: the raw grant-form rows, not grants.
///
/// The store collapses the rows itself so the checkbox-dependency invariant
/// (module enabled + at least one action) holds no matter which UI submitted.
#[derive(Debug, Clone)]
pub struct NewBranchUser {
    pub user_id: UserId,
    pub branch_id: BranchId,
    pub modules: Vec<ModuleGrantForm>,
    pub is_manager: bool,
}

/// Filter for [`AssignmentStore::list`]. Empty filter returns everything.
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    /// Only assignments at this branch.
    pub branch: Option<BranchId>,
    /// Free-text match against the assigned user's directory name/email.
    pub query: Option<String>,
}

/// CRUD over assignment rows, via the document-store collaborator.
pub struct AssignmentStore {
    documents: Arc<dyn DocumentStore>,
    directory: Arc<dyn UserDirectory>,
    registry: Arc<BranchRegistry>,
}

impl AssignmentStore {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        directory: Arc<dyn UserDirectory>,
        registry: Arc<BranchRegistry>,
    ) -> Self {
        Self {
            documents,
            directory,
            registry,
        }
    }

    /// Create and persist an assignment from submitted form rows.
    ///
    /// Disabled modules and enabled-but-empty modules contribute no grant.
    /// Write failures are surfaced to the caller with the store's message;
    /// nothing is retried.
    pub async fn create(&self, input: NewBranchUser) -> Result<BranchUser, StoreError> {
        let permissions: Vec<ModuleGrant> = input
            .modules
            .into_iter()
            .filter_map(ModuleGrantForm::into_grant)
            .collect();

        let now = Utc::now();
        let row = BranchUser {
            id: AssignmentId::new(),
            user_id: input.user_id,
            branch_id: input.branch_id,
            permissions,
            is_manager: input.is_manager,
            created_at: now,
            updated_at: now,
        };

        let document = serde_json::to_value(&row).map_err(|e| StoreError::Write(e.to_string()))?;
        if let Err(e) = self
            .documents
            .insert(COLLECTION, &row.id.to_string(), document)
            .await
        {
            error!(error = %e, user = %row.user_id, branch = %row.branch_id, "assignment write failed");
            return Err(e);
        }
        Ok(row)
    }

    /// List assignments matching `filter`.
    pub async fn list(&self, filter: &AssignmentFilter) -> Result<Vec<BranchUser>, StoreError> {
        let documents = self.documents.list(COLLECTION).await?;
        let mut rows = Vec::with_capacity(documents.len());
        for document in documents {
            let row: BranchUser =
                serde_json::from_value(document).map_err(|e| StoreError::Corrupt {
                    collection: COLLECTION.to_string(),
                    message: e.to_string(),
                })?;
            rows.push(row);
        }

        if let Some(branch) = &filter.branch {
            rows.retain(|r| &r.branch_id == branch);
        }

        if let Some(query) = filter.query.as_deref().filter(|q| !q.is_empty()) {
            let needle = query.to_lowercase();
            let mut matched = Vec::new();
            for row in rows {
                let profile = self.directory.profile(&row.user_id).await?;
                let hit = profile.is_some_and(|p| {
                    p.name.to_lowercase().contains(&needle)
                        || p.email.to_lowercase().contains(&needle)
                });
                if hit {
                    matched.push(row);
                }
            }
            rows = matched;
        }

        Ok(rows)
    }

    /// Display name of a user, from the directory.
    pub async fn user_name_for(&self, user_id: &UserId) -> Result<Option<String>, StoreError> {
        Ok(self.directory.profile(user_id).await?.map(|p| p.name))
    }

    /// Display name of a branch, from the registry.
    pub fn branch_name_for(&self, branch_id: &BranchId) -> Option<String> {
        self.registry
            .list()
            .into_iter()
            .find(|b| &b.id == branch_id)
            .map(|b| b.name)
    }
}
