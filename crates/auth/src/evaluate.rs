//! The two access decision functions.
//!
//! Every gate in the back office funnels through one of these:
//! [`can_access_route`] for navigation, [`can_perform`] for module actions
//! inside admin screens. Both are pure: no IO, no panics, no logging — the
//! callers own the side effects of a decision.

use crate::{AccessPolicy, Action, ModuleGrant, Role};

/// Route-level check: may a user with this primary role open this route?
///
/// - An empty `allowed` list means the route is open to any authenticated
///   user, whatever their role (including none).
/// - Otherwise the role must be present and listed, or be `admin` while the
///   route-layer bypass is on.
/// - A missing role never passes a gated route (fail closed).
pub fn can_access_route(role: Option<Role>, allowed: &[Role], policy: &AccessPolicy) -> bool {
    if allowed.is_empty() {
        return true;
    }
    match role {
        Some(role) => {
            allowed.contains(&role) || (policy.admin_bypass_routes && role.is_admin())
        }
        None => false,
    }
}

/// Module-action check: may this assignment perform `action` on `module`?
///
/// `grants` is the assignment's grant list, or `None` when the user has no
/// assignment at the active branch — which denies everything. The admin
/// bypass only applies here when `admin_bypass_modules` is set; the shipped
/// policy leaves it off, so even admins need an explicit grant at this layer.
pub fn can_perform(
    role: Option<Role>,
    grants: Option<&[ModuleGrant]>,
    module: &str,
    action: Action,
    policy: &AccessPolicy,
) -> bool {
    if policy.admin_bypass_modules && role.is_some_and(|r| r.is_admin()) {
        return true;
    }
    let Some(grants) = grants else {
        return false;
    };
    grants
        .iter()
        .find(|g| g.module == module)
        .is_some_and(|g| g.allows(action))
}
