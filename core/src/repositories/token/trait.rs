//! Refresh token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for RefreshToken persistence operations
///
/// Tokens are addressed by `token_hash`, the hex SHA-256 of the opaque value
/// held by the client. The raw value never reaches the repository.
///
/// # Security Considerations
/// - Lookups must never return expired rows
/// - `delete` must report whether *this* call removed the row; rotation relies
///   on it as the single-use claim
/// - Deleted rows are never revived
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Save a new refresh token
    ///
    /// # Arguments
    /// * `token` - The RefreshToken row to persist
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved row
    /// * `Err(DomainError)` - Save failed (e.g., duplicate hash)
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::{Duration, Utc};
    /// # use uuid::Uuid;
    /// # use st_core::repositories::RefreshTokenRepository;
    /// # use st_core::domain::RefreshToken;
    /// # async fn example(repo: &impl RefreshTokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let token = RefreshToken::new(Uuid::new_v4(), "a".repeat(64), Utc::now(), Duration::days(7));
    ///
    /// let saved = repo.create(token).await?;
    /// println!("Token saved with ID: {}", saved.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a non-expired refresh token by its hash
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Token found and not expired
    /// * `Ok(None)` - Unknown or expired; the two are not distinguished
    /// * `Err(DomainError)` - Storage failure
    async fn find_by_token(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Find all non-expired refresh tokens for a user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError>;

    /// Delete a refresh token by its hash
    ///
    /// # Returns
    /// * `Ok(true)` - This call removed the row
    /// * `Ok(false)` - No such row (already deleted or never existed)
    /// * `Err(DomainError)` - Storage failure
    async fn delete(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Delete every refresh token of a user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows removed
    async fn delete_by_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete expired refresh tokens
    ///
    /// Called periodically by the sweeper.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of expired rows removed
    async fn delete_expired(&self) -> Result<usize, DomainError>;
}
