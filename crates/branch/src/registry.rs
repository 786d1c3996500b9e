//! The branch registry: all branches plus the current-branch pointer.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use sentryops_core::{keys, BranchId, KvStore};

use crate::bus::{BranchChanged, Subscription};
use crate::Branch;

/// What `set_current` does when handed an id that is not in the registry.
///
/// The shipped product silently kept the previous selection; `Error` is the
/// loud alternative. Pinned by tests either way so a change is deliberate.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BranchNotFoundPolicy {
    #[default]
    Ignore,
    Error,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("branch '{0}' is not in the registry")]
    BranchNotFound(BranchId),
}

#[derive(Debug)]
struct State {
    branches: Vec<Branch>,
    current: Option<BranchId>,
}

/// Process-wide branch state.
///
/// The registry is the single writer of both the branch list and the
/// current-branch pointer; everything else reads. Replacing the list and
/// re-pointing into it happen under one lock so the pointer can never dangle.
pub struct BranchRegistry {
    kv: Arc<dyn KvStore>,
    policy: BranchNotFoundPolicy,
    state: RwLock<State>,
}

impl BranchRegistry {
    /// Load persisted state, seeding a fresh deployment with the HQ branch.
    pub fn load(kv: Arc<dyn KvStore>, policy: BranchNotFoundPolicy) -> Self {
        let branches = match kv.get(keys::BRANCHES) {
            Some(raw) => match serde_json::from_str::<Vec<Branch>>(&raw) {
                Ok(list) if !list.is_empty() => list,
                Ok(_) => Self::seed(&kv),
                Err(e) => {
                    warn!(error = %e, "persisted branch list is corrupt, reseeding");
                    Self::seed(&kv)
                }
            },
            None => Self::seed(&kv),
        };

        let persisted = kv.get(keys::SELECTED_BRANCH_ID).map(BranchId::new);
        let current = Self::resolve_pointer(&branches, persisted);
        Self::persist_current(&kv, current.as_ref());

        Self {
            kv,
            policy,
            state: RwLock::new(State { branches, current }),
        }
    }

    fn seed(kv: &Arc<dyn KvStore>) -> Vec<Branch> {
        let seeded = vec![Branch::main_seed(Utc::now())];
        if let Ok(raw) = serde_json::to_string(&seeded) {
            kv.set(keys::BRANCHES, &raw);
        }
        seeded
    }

    /// Re-resolve a (possibly dangling) pointer against a branch list:
    /// keep it if present, else fall back to main, else the first branch.
    fn resolve_pointer(branches: &[Branch], wanted: Option<BranchId>) -> Option<BranchId> {
        if let Some(id) = wanted {
            if branches.iter().any(|b| b.id == id) {
                return Some(id);
            }
            debug!(branch = %id, "persisted branch selection is gone, falling back");
        }
        branches
            .iter()
            .find(|b| b.is_main())
            .or_else(|| branches.first())
            .map(|b| b.id.clone())
    }

    fn persist_current(kv: &Arc<dyn KvStore>, current: Option<&BranchId>) {
        match current {
            Some(id) => kv.set(keys::SELECTED_BRANCH_ID, id.as_str()),
            None => kv.remove(keys::SELECTED_BRANCH_ID),
        }
    }

    fn persist_branches(&self, branches: &[Branch]) {
        if let Ok(raw) = serde_json::to_string(branches) {
            self.kv.set(keys::BRANCHES, &raw);
        }
    }

    pub fn list(&self) -> Vec<Branch> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).branches.clone()
    }

    pub fn current(&self) -> Option<Branch> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let id = state.current.as_ref()?;
        state.branches.iter().find(|b| &b.id == id).cloned()
    }

    pub fn current_id(&self) -> Option<BranchId> {
        self.state.read().unwrap_or_else(PoisonError::into_inner).current.clone()
    }

    /// Whether the current selection is the HQ branch.
    pub fn is_main(&self) -> bool {
        self.current_id().is_some_and(|id| id.is_main())
    }

    /// Point the selection at `id`.
    ///
    /// Unknown ids follow the configured [`BranchNotFoundPolicy`]; under
    /// `Ignore` the previous selection stays and the call succeeds.
    pub fn set_current(&self, id: &BranchId) -> Result<(), RegistryError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !state.branches.iter().any(|b| &b.id == id) {
            return match self.policy {
                BranchNotFoundPolicy::Ignore => {
                    warn!(branch = %id, "ignoring switch to unknown branch");
                    Ok(())
                }
                BranchNotFoundPolicy::Error => Err(RegistryError::BranchNotFound(id.clone())),
            };
        }
        state.current = Some(id.clone());
        Self::persist_current(&self.kv, Some(id));
        Ok(())
    }

    /// Swap in a new branch list (bulk edits from the admin screens).
    ///
    /// The current pointer is re-resolved strictly: if the selected id is not
    /// in the new list, the selection becomes `None` rather than silently
    /// jumping to another branch.
    pub fn replace_all(&self, branches: Vec<Branch>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let still_there = state
            .current
            .as_ref()
            .is_some_and(|id| branches.iter().any(|b| &b.id == id));
        if !still_there {
            state.current = None;
            Self::persist_current(&self.kv, None);
        }
        self.persist_branches(&branches);
        state.branches = branches;
    }

    /// Apply pending `branch-changed` broadcasts from non-descendant UI.
    ///
    /// Broadcast senders cannot handle errors, so unknown ids are logged and
    /// dropped regardless of policy.
    pub fn apply_broadcasts(&self, subscription: &Subscription<BranchChanged>) {
        for BranchChanged { branch_id } in subscription.drain() {
            if let Err(e) = self.set_current(&branch_id) {
                warn!(error = %e, "dropping broadcast branch switch");
            }
        }
    }
}
