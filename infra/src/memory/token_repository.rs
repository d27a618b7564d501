use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use st_core::domain::RefreshToken;
use st_core::errors::DomainError;
use st_core::repositories::RefreshTokenRepository;
use st_core::services::Clock;

/// Refresh token store keyed by token hash
///
/// Expiry is judged against the injected clock. `delete` runs under the write
/// lock, so exactly one of several concurrent callers observes `true`.
pub struct InMemoryRefreshTokenRepository {
    tokens: RwLock<HashMap<String, RefreshToken>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored rows, expired ones included
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::internal("refresh token hash already exists"));
        }

        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_token(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let now = self.clock.now();
        Ok(self
            .tokens
            .read()
            .await
            .get(token_hash)
            .filter(|t| !t.is_expired_at(now))
            .cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let now = self.clock.now();
        let mut found: Vec<RefreshToken> = self
            .tokens
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id && !t.is_expired_at(now))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete(&self, token_hash: &str) -> Result<bool, DomainError> {
        Ok(self.tokens.write().await.remove(token_hash).is_some())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.user_id != user_id);
        Ok(before - tokens.len())
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let now = self.clock.now();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_expired_at(now));
        Ok(before - tokens.len())
    }
}
