use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use st_core::domain::User;
use st_core::errors::{AuthError, DomainError};
use st_core::repositories::UserRepository;

/// User store keyed by id, with a unique index on the normalized email
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Users>,
}

#[derive(Default)]
struct Users {
    by_id: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if users.by_email.contains_key(&user.email) {
            return Err(AuthError::RegistrationFailed.into());
        }

        users.by_email.insert(user.email.clone(), user.id);
        users.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        let Some(previous) = users.by_id.get(&user.id).map(|u| u.email.clone()) else {
            return Err(DomainError::internal(format!(
                "User {} not found for update",
                user.id
            )));
        };

        if previous != user.email {
            if users.by_email.contains_key(&user.email) {
                return Err(AuthError::RegistrationFailed.into());
            }
            users.by_email.remove(&previous);
            users.by_email.insert(user.email.clone(), user.id);
        }

        users.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        match users.by_id.remove(&id) {
            Some(user) => {
                users.by_email.remove(&user.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
