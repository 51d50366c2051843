//! In-memory user store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tasktrack_core::{User, UserId};

use super::{StoreError, UserStore};

#[derive(Default)]
struct Users {
    by_id: HashMap<UserId, User>,
    /// Lowercased email -> user id.
    by_email: HashMap<String, UserId>,
}

/// User store with a unique, case-insensitive email index.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Users>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let key = user.email.to_lowercase();
        if users.by_email.contains_key(&key) {
            return Err(StoreError::Conflict(user.email));
        }
        users.by_email.insert(key, user.id.clone());
        users.by_id.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .by_email
            .get(&email.to_lowercase())
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.by_id.get(id).cloned())
    }
}
