//! Fail-closed session resolution.

use std::sync::Arc;

use tracing::warn;

use sentryops_core::{keys, KvStore, UserId};

use crate::provider::{AuthEvent, AuthProvider, AuthSession};
use crate::role_store::RoleStore;

/// The resolved authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user_id: Option<UserId>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            user_id: None,
        }
    }

    pub fn for_user(user_id: UserId) -> Self {
        Self {
            is_authenticated: true,
            user_id: Some(user_id),
        }
    }
}

/// Turns the auth collaborator's answers into a [`Session`].
///
/// Any failure from the collaborator resolves to anonymous: an access
/// decision must never be more permissive because a dependency was down.
pub struct SessionResolver {
    kv: Arc<dyn KvStore>,
    provider: Arc<dyn AuthProvider>,
    roles: Arc<RoleStore>,
}

impl SessionResolver {
    pub fn new(kv: Arc<dyn KvStore>, provider: Arc<dyn AuthProvider>, roles: Arc<RoleStore>) -> Self {
        Self {
            kv,
            provider,
            roles,
        }
    }

    /// Resolve the current session.
    ///
    /// A newly authenticated session with a cold role cache kicks off a role
    /// refresh so the first gated navigation does not have to pay for it.
    pub async fn resolve(&self) -> Session {
        let session = match self.provider.session().await {
            Ok(Some(auth)) => {
                self.remember_profile(&auth);
                Session::for_user(auth.user_id)
            }
            Ok(None) => Session::anonymous(),
            Err(e) => {
                warn!(error = %e, "session lookup failed, treating as unauthenticated");
                Session::anonymous()
            }
        };

        self.kv.set(
            keys::IS_AUTHENTICATED,
            if session.is_authenticated { "true" } else { "false" },
        );

        if session.is_authenticated && self.roles.cached(&session).is_none() {
            self.roles.refresh(&session).await;
        }
        session
    }

    /// Apply a change notification from the collaborator's auth stream.
    ///
    /// Signing out clears the cached role and profile context so the next
    /// account on this device starts cold.
    pub async fn apply_auth_event(&self, event: AuthEvent) -> Session {
        match event {
            AuthEvent::SignedIn(auth) => {
                self.remember_profile(&auth);
                let session = Session::for_user(auth.user_id);
                self.kv.set(keys::IS_AUTHENTICATED, "true");
                if self.roles.cached(&session).is_none() {
                    self.roles.refresh(&session).await;
                }
                session
            }
            AuthEvent::SignedOut => {
                self.roles.clear();
                self.kv.set(keys::IS_AUTHENTICATED, "false");
                Session::anonymous()
            }
        }
    }

    /// Keep display-only profile fields around for the header widgets.
    fn remember_profile(&self, auth: &AuthSession) {
        if let Some(email) = &auth.email {
            self.kv.set(keys::USER_EMAIL, email);
        }
        if let Some(name) = &auth.name {
            self.kv.set(keys::USER_NAME, name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::provider::AuthError;
    use sentryops_auth::Role;

    #[derive(Default)]
    struct MemKv(Mutex<HashMap<String, String>>);

    impl KvStore for MemKv {
        fn get(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key).cloned()
        }
        fn set(&self, key: &str, value: &str) {
            self.0.lock().unwrap().insert(key.to_string(), value.to_string());
        }
        fn remove(&self, key: &str) {
            self.0.lock().unwrap().remove(key);
        }
    }

    struct FakeAuth {
        session: Mutex<Result<Option<AuthSession>, AuthError>>,
        roles: Vec<String>,
        role_calls: AtomicUsize,
    }

    impl FakeAuth {
        fn signed_in(user_id: UserId, tags: &[&str]) -> Self {
            Self {
                session: Mutex::new(Ok(Some(AuthSession {
                    user_id,
                    email: Some("guard@sentry.example".to_string()),
                    name: Some("Guard Admin".to_string()),
                }))),
                roles: tags.iter().map(|t| t.to_string()).collect(),
                role_calls: AtomicUsize::new(0),
            }
        }

        fn broken() -> Self {
            Self {
                session: Mutex::new(Err(AuthError::Unavailable("boom".to_string()))),
                roles: vec![],
                role_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AuthProvider for FakeAuth {
        async fn session(&self) -> Result<Option<AuthSession>, AuthError> {
            self.session.lock().unwrap().clone()
        }

        async fn user_roles(&self) -> Result<Vec<String>, AuthError> {
            self.role_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.roles.clone())
        }
    }

    struct Fixture {
        kv: Arc<MemKv>,
        provider: Arc<FakeAuth>,
        roles: Arc<RoleStore>,
        resolver: SessionResolver,
    }

    fn fixture(provider: FakeAuth) -> Fixture {
        let kv = Arc::new(MemKv::default());
        let provider = Arc::new(provider);
        let roles = Arc::new(RoleStore::new(kv.clone(), provider.clone()));
        let resolver = SessionResolver::new(kv.clone(), provider.clone(), roles.clone());
        Fixture {
            kv,
            provider,
            roles,
            resolver,
        }
    }

    #[tokio::test]
    async fn collaborator_failure_resolves_to_anonymous() {
        let fx = fixture(FakeAuth::broken());
        let session = fx.resolver.resolve().await;
        assert_eq!(session, Session::anonymous());
        assert_eq!(fx.kv.get(keys::IS_AUTHENTICATED).unwrap(), "false");
    }

    #[tokio::test]
    async fn fresh_session_warms_the_role_cache_once() {
        let user = UserId::new();
        let fx = fixture(FakeAuth::signed_in(user, &["sales"]));

        let session = fx.resolver.resolve().await;
        assert_eq!(session, Session::for_user(user));
        assert_eq!(fx.roles.cached(&session), Some(Role::Sales));
        assert_eq!(fx.kv.get(keys::USER_EMAIL).unwrap(), "guard@sentry.example");

        fx.resolver.resolve().await;
        assert_eq!(fx.provider.role_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sign_out_clears_role_and_flags() {
        let user = UserId::new();
        let fx = fixture(FakeAuth::signed_in(user, &["hr"]));

        let session = fx.resolver.resolve().await;
        assert_eq!(fx.roles.cached(&session), Some(Role::Hr));

        let after = fx.resolver.apply_auth_event(AuthEvent::SignedOut).await;
        assert_eq!(after, Session::anonymous());
        assert_eq!(fx.kv.get(keys::USER_ROLE), None);
        assert_eq!(fx.kv.get(keys::IS_AUTHENTICATED).unwrap(), "false");
    }

    #[tokio::test]
    async fn account_switch_keeps_the_new_users_profile_fields() {
        let user = UserId::new();
        let fx = fixture(FakeAuth::signed_in(user, &["sales"]));

        // Cache rows left behind by a previous account on this device.
        fx.kv.set(keys::USER_ID, &UserId::new().to_string());
        fx.kv.set(keys::USER_ROLE, "admin");

        let session = fx.resolver.resolve().await;
        assert_eq!(session, Session::for_user(user));
        assert_eq!(fx.roles.cached(&session), Some(Role::Sales));
        assert_eq!(
            fx.kv.get(keys::USER_EMAIL).as_deref(),
            Some("guard@sentry.example")
        );
        assert_eq!(fx.kv.get(keys::USER_NAME).as_deref(), Some("Guard Admin"));
        assert_eq!(fx.kv.get(keys::USER_ID).unwrap(), user.to_string());
    }

    #[tokio::test]
    async fn sign_in_event_warms_the_cache_for_the_new_user() {
        let fx = fixture(FakeAuth::signed_in(UserId::new(), &["accounts"]));
        let user = UserId::new();
        let session = fx
            .resolver
            .apply_auth_event(AuthEvent::SignedIn(AuthSession {
                user_id: user,
                email: None,
                name: None,
            }))
            .await;
        assert_eq!(session, Session::for_user(user));
        assert_eq!(fx.roles.cached(&session), Some(Role::Accounts));
    }
}
