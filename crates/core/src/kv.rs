//! Local key-value persistence port.
//!
//! The browser-era deployment of this system kept its small client-side state
//! (cached role, branch list, current-branch pointer) in a string key-value
//! store. This port keeps that contract: synchronous, string-valued, and
//! infallible reads. Adapters live in `sentryops-infra`.

/// Well-known persistence keys.
///
/// Key names are load-bearing: existing deployments already hold data under
/// them, so renaming would orphan persisted state.
pub mod keys {
    /// Cached primary role of the signed-in user.
    pub const USER_ROLE: &str = "userRole";
    /// Cached display email of the signed-in user.
    pub const USER_EMAIL: &str = "userEmail";
    /// Cached display name of the signed-in user.
    pub const USER_NAME: &str = "userName";
    /// Owner of the cached role/profile rows. Not a legacy key: added so a
    /// cached role is never served to a different user on the same device.
    pub const USER_ID: &str = "userId";
    /// Flag mirroring the auth collaborator's session state.
    pub const IS_AUTHENTICATED: &str = "isAuthenticated";
    /// JSON-encoded list of all branches.
    pub const BRANCHES: &str = "branches";
    /// Id of the currently selected branch.
    pub const SELECTED_BRANCH_ID: &str = "selectedBranchId";
}

/// Synchronous string key-value storage.
///
/// Implementations must be safe for shared use from a single-threaded event
/// loop or from tests; they are not expected to survive process crashes.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}
