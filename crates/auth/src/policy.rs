use serde::{Deserialize, Serialize};

/// Named configuration for the admin super-role bypass.
///
/// The shipped behavior is asymmetric: `admin` bypasses route-level role
/// lists but gets no implicit grant at the module-action layer. Whether that
/// asymmetry is intentional is an open product question, so both layers are
/// governed by an explicit flag here instead of being hardwired — tests pin
/// the current answer and a one-line config change flips it deliberately.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Admin satisfies any route's allowed-roles list.
    pub admin_bypass_routes: bool,
    /// Admin satisfies any module-action check without an explicit grant.
    pub admin_bypass_modules: bool,
}

impl AccessPolicy {
    /// The policy the system has always shipped with.
    pub const fn shipped() -> Self {
        Self {
            admin_bypass_routes: true,
            admin_bypass_modules: false,
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::shipped()
    }
}
