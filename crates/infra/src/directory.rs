use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use sentryops_branch::{StoreError, UserDirectory, UserProfile};
use sentryops_core::UserId;

/// In-memory user directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, profile: UserProfile) {
        self.profiles
            .write()
            .expect("directory lock poisoned")
            .insert(profile.id, profile);
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .expect("directory lock poisoned")
            .get(user_id)
            .cloned())
    }
}
