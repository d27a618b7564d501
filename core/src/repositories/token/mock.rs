//! Mock implementation of RefreshTokenRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;
use crate::services::clock::Clock;

use super::r#trait::RefreshTokenRepository;

/// Mock token repository for testing, keyed by token hash
pub struct MockRefreshTokenRepository {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
    clock: Arc<dyn Clock>,
    latency: Option<Duration>,
}

impl MockRefreshTokenRepository {
    /// Create a new mock repository reading expiry against `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            clock,
            latency: None,
        }
    }

    /// Delay every operation, to exercise store timeouts
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of stored rows, expired ones included
    pub async fn count(&self) -> usize {
        self.tokens.read().await.len()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        self.simulate_latency().await;
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::internal("refresh token hash already exists"));
        }

        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_token(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        self.simulate_latency().await;
        let now = self.clock.now();
        let tokens = self.tokens.read().await;
        Ok(tokens
            .get(token_hash)
            .filter(|t| !t.is_expired_at(now))
            .cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        self.simulate_latency().await;
        let now = self.clock.now();
        let tokens = self.tokens.read().await;
        let mut found: Vec<RefreshToken> = tokens
            .values()
            .filter(|t| t.user_id == user_id && !t.is_expired_at(now))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete(&self, token_hash: &str) -> Result<bool, DomainError> {
        self.simulate_latency().await;
        let mut tokens = self.tokens.write().await;
        Ok(tokens.remove(token_hash).is_some())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        self.simulate_latency().await;
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.user_id != user_id);
        Ok(before - tokens.len())
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        self.simulate_latency().await;
        let now = self.clock.now();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !t.is_expired_at(now));
        Ok(before - tokens.len())
    }
}
