use std::sync::Mutex;

use async_trait::async_trait;

use sentryops_session::{AuthError, AuthProvider, AuthSession};

/// Auth provider with a settable session and role-tag list.
///
/// `fail_session` / `fail_roles` turn the corresponding call into an error,
/// for exercising the fail-closed paths.
#[derive(Debug, Default)]
pub struct StaticAuthProvider {
    session: Mutex<Option<AuthSession>>,
    roles: Mutex<Vec<String>>,
    fail_session: Mutex<bool>,
    fail_roles: Mutex<bool>,
}

impl StaticAuthProvider {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(session: AuthSession, roles: &[&str]) -> Self {
        let provider = Self::default();
        provider.set_session(Some(session));
        provider.set_roles(roles);
        provider
    }

    pub fn set_session(&self, session: Option<AuthSession>) {
        *self.session.lock().expect("provider lock poisoned") = session;
    }

    pub fn set_roles(&self, roles: &[&str]) {
        *self.roles.lock().expect("provider lock poisoned") =
            roles.iter().map(|r| r.to_string()).collect();
    }

    pub fn set_fail_session(&self, fail: bool) {
        *self.fail_session.lock().expect("provider lock poisoned") = fail;
    }

    pub fn set_fail_roles(&self, fail: bool) {
        *self.fail_roles.lock().expect("provider lock poisoned") = fail;
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn session(&self) -> Result<Option<AuthSession>, AuthError> {
        if *self.fail_session.lock().expect("provider lock poisoned") {
            return Err(AuthError::Unavailable("injected failure".to_string()));
        }
        Ok(self.session.lock().expect("provider lock poisoned").clone())
    }

    async fn user_roles(&self) -> Result<Vec<String>, AuthError> {
        if *self.fail_roles.lock().expect("provider lock poisoned") {
            return Err(AuthError::RoleLookup("injected failure".to_string()));
        }
        Ok(self.roles.lock().expect("provider lock poisoned").clone())
    }
}
