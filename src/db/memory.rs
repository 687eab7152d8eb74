use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{StoreError, UserStore};
use crate::models::user::{User, UserPage};

/// Process-local user collection. Used by tests and by `DATABASE_URL=memory://`.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn email_or_phone_taken(&self, email: &str, phone: &str) -> Result<bool, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.email == email || u.phone == phone))
    }

    async fn insert(&self, user: &User) -> Result<String, StoreError> {
        let mut users = self.users.write().await;
        // Uniqueness is enforced under the write lock.
        if users.iter().any(|u| {
            u.user_id == user.user_id || u.email == user.email || u.phone == user.phone
        }) {
            return Err(StoreError::Duplicate);
        }
        users.push(user.clone());
        Ok(user.user_id.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;
        user.token = Some(token.to_string());
        user.refresh_token = Some(refresh_token.to_string());
        user.updated_at = updated_at;
        Ok(())
    }

    async fn list(&self, start_index: u64, limit: u64) -> Result<UserPage, StoreError> {
        let users = self.users.read().await;
        let user_items = users
            .iter()
            .skip(usize::try_from(start_index).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(UserPage {
            total_count: users.len() as u64,
            user_items,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
