use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{NewUser, User, UserStore};

/// In-memory store used by tests.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    pub async fn update<F>(&self, id: &str, edit: F)
    where
        F: FnOnce(&mut User),
    {
        if let Some(user) = self.users.write().await.iter_mut().find(|u| u.id == id) {
            edit(user);
        }
    }

    pub async fn remove(&self, id: &str) {
        self.users.write().await.retain(|u| u.id != id);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let user = User {
            id: user.id,
            email: user.email,
            name: user.name,
            image: user.image,
            hashed_password: user.hashed_password,
            username: user.username,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }
}

/// Store whose every call fails, for exercising degradation paths.
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn find_by_email(&self, _email: &str) -> anyhow::Result<Option<User>> {
        anyhow::bail!("connection refused")
    }

    async fn find_by_id(&self, _id: &str) -> anyhow::Result<Option<User>> {
        anyhow::bail!("connection refused")
    }

    async fn create(&self, _user: NewUser) -> anyhow::Result<Option<User>> {
        anyhow::bail!("connection refused")
    }
}
