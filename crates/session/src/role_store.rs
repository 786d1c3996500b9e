//! Primary-role resolution with a local cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use sentryops_auth::Role;
use sentryops_core::{keys, KvStore};

use crate::provider::AuthProvider;
use crate::resolver::Session;

/// Resolves and caches the signed-in user's primary role.
///
/// The cache is keyed by user id: a cached role written for one account is a
/// miss (and is evicted) for any other account on the same device. Refreshes
/// carry a monotonic token so a slow response that lost the race can never
/// overwrite a fresher one.
pub struct RoleStore {
    kv: Arc<dyn KvStore>,
    provider: Arc<dyn AuthProvider>,
    latest: AtomicU64,
}

impl RoleStore {
    pub fn new(kv: Arc<dyn KvStore>, provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            kv,
            provider,
            latest: AtomicU64::new(0),
        }
    }

    /// Cached role for this session, if the cache belongs to its user.
    pub fn cached(&self, session: &Session) -> Option<Role> {
        let user_id = session.user_id?;
        match self.kv.get(keys::USER_ID) {
            Some(owner) if owner == user_id.to_string() => {
                self.kv.get(keys::USER_ROLE)?.parse().ok()
            }
            Some(_) => {
                // Cache rows belong to a previous account on this device.
                // Only the role/owner rows go: the resolver has already
                // written the new user's profile fields by this point.
                debug!("evicting role cache owned by another user");
                self.evict_role();
                None
            }
            None => None,
        }
    }

    /// Cached role, or a refresh when the cache is cold.
    pub async fn role(&self, session: &Session) -> Option<Role> {
        if let Some(role) = self.cached(session) {
            return Some(role);
        }
        self.refresh(session).await
    }

    /// Ask the collaborator for the user's role tags and cache the selection.
    ///
    /// Selection rule: `admin` if present anywhere, else the first
    /// recognizable tag. Lookup failures are logged and leave the role
    /// absent — a missing role denies every gated route downstream, so the
    /// failure mode is closed.
    pub async fn refresh(&self, session: &Session) -> Option<Role> {
        let user_id = session.user_id?;
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let tags = match self.provider.user_roles().await {
            Ok(tags) => tags,
            Err(e) => {
                warn!(error = %e, "role lookup failed, leaving role unset");
                return None;
            }
        };

        if self.latest.load(Ordering::SeqCst) != token {
            debug!("discarding stale role refresh");
            return None;
        }

        let role = Role::select_primary(&tags)?;
        self.kv.set(keys::USER_ID, &user_id.to_string());
        self.kv.set(keys::USER_ROLE, role.as_str());
        Some(role)
    }

    /// Drop the role and owner rows, leaving profile fields alone.
    fn evict_role(&self) {
        for key in [keys::USER_ROLE, keys::USER_ID] {
            self.kv.remove(key);
        }
    }

    /// Drop every cached role/profile row (sign-out).
    pub fn clear(&self) {
        for key in [keys::USER_ROLE, keys::USER_EMAIL, keys::USER_NAME, keys::USER_ID] {
            self.kv.remove(key);
        }
    }
}
