//! Per-module permission grants and the roles derived from them.

use serde::{Deserialize, Serialize};

use sentryops_core::{DomainError, DomainResult};

use crate::Action;

/// Fine-grained grant: a module name and the actions allowed on it.
///
/// Invariant: `actions` is never empty. A module with nothing allowed is not
/// a grant, and persisting one would be meaningless — construction refuses it
/// rather than relying on whatever form UI sits in front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleGrant {
    pub module: String,
    pub actions: Vec<Action>,
}

impl ModuleGrant {
    pub fn new(module: impl Into<String>, actions: Vec<Action>) -> DomainResult<Self> {
        if actions.is_empty() {
            return Err(DomainError::invariant("module grant with no actions"));
        }
        // Dedupe by membership; callers outside the form path may hand in
        // duplicates in any order.
        let mut deduped: Vec<Action> = Vec::with_capacity(actions.len());
        for action in actions {
            if !deduped.contains(&action) {
                deduped.push(action);
            }
        }
        Ok(Self {
            module: module.into(),
            actions: deduped,
        })
    }

    pub fn allows(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

/// One row of the grant-editing form: a module, its enable toggle, and the
/// four action checkboxes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleGrantForm {
    pub module: String,
    pub enabled: bool,
    pub view: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl ModuleGrantForm {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    /// Collapse the row into a grant.
    ///
    /// A disabled module yields nothing regardless of its checkbox state, and
    /// an enabled module with no action checked yields nothing either. This is
    /// where the checkbox-dependency invariant is enforced for good, not in
    /// the UI.
    pub fn into_grant(self) -> Option<ModuleGrant> {
        if !self.enabled {
            return None;
        }
        let mut actions = Vec::new();
        if self.view {
            actions.push(Action::View);
        }
        if self.create {
            actions.push(Action::Create);
        }
        if self.update {
            actions.push(Action::Update);
        }
        if self.delete {
            actions.push(Action::Delete);
        }
        ModuleGrant::new(self.module, actions).ok()
    }
}

/// Map a module name to the role tag it implies on the assignment row.
///
/// The mapping is 1:1 except for the office-administration module, whose tag
/// predates the module rename and stayed `office` in persisted rows.
pub fn role_tag_for_module(module: &str) -> String {
    match module {
        "office-admin" => "office".to_string(),
        other => other.to_string(),
    }
}

/// Derive the role-tag list for an assignment from its grants.
///
/// Roles are a pure function of the grants plus the manager flag; they are
/// never stored, so they can never drift out of sync with the grants.
pub fn derived_roles(grants: &[ModuleGrant], is_manager: bool) -> Vec<String> {
    let mut roles: Vec<String> = grants
        .iter()
        .map(|g| role_tag_for_module(&g.module))
        .collect();
    if is_manager {
        roles.push("manager".to_string());
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_requires_at_least_one_action() {
        assert!(ModuleGrant::new("sales", vec![]).is_err());
        assert!(ModuleGrant::new("sales", vec![Action::View]).is_ok());
    }

    #[test]
    fn grant_drops_duplicate_actions_wherever_they_sit() {
        let grant = ModuleGrant::new(
            "sales",
            vec![Action::View, Action::Delete, Action::View],
        )
        .unwrap();
        assert_eq!(grant.actions, vec![Action::View, Action::Delete]);
    }

    #[test]
    fn disabled_module_yields_no_grant_even_with_actions_checked() {
        let row = ModuleGrantForm {
            module: "sales".to_string(),
            enabled: false,
            view: true,
            create: true,
            ..Default::default()
        };
        assert_eq!(row.into_grant(), None);
    }

    #[test]
    fn enabled_module_with_no_actions_yields_no_grant() {
        let row = ModuleGrantForm {
            module: "sales".to_string(),
            enabled: true,
            ..Default::default()
        };
        assert_eq!(row.into_grant(), None);
    }

    #[test]
    fn enabled_module_collects_checked_actions_only() {
        let row = ModuleGrantForm {
            module: "sales".to_string(),
            enabled: true,
            view: true,
            delete: true,
            ..Default::default()
        };
        let grant = row.into_grant().unwrap();
        assert_eq!(grant.module, "sales");
        assert_eq!(grant.actions, vec![Action::View, Action::Delete]);
    }

    #[test]
    fn office_admin_module_maps_to_office_tag() {
        assert_eq!(role_tag_for_module("office-admin"), "office");
        assert_eq!(role_tag_for_module("hr"), "hr");
    }

    #[test]
    fn derived_roles_appends_manager_last() {
        let grants = vec![
            ModuleGrant::new("sales", vec![Action::View]).unwrap(),
            ModuleGrant::new("office-admin", vec![Action::View]).unwrap(),
        ];
        assert_eq!(derived_roles(&grants, true), vec!["sales", "office", "manager"]);
    }

    #[test]
    fn manager_with_no_grants_is_just_manager() {
        assert_eq!(derived_roles(&[], true), vec!["manager"]);
        assert!(derived_roles(&[], false).is_empty());
    }
}
