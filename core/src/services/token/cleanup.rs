//! Refresh token sweeper for periodic removal of expired rows
//!
//! Expired rows are already invisible to lookups; sweeping keeps the table small.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::errors::DomainError;
use crate::repositories::RefreshTokenRepository;

/// Background purger of expired refresh tokens
pub struct RefreshTokenSweeper<R: RefreshTokenRepository + 'static> {
    repository: Arc<R>,
    interval: Duration,
    store_timeout: Duration,
}

impl<R: RefreshTokenRepository> RefreshTokenSweeper<R> {
    /// Create a new sweeper
    ///
    /// # Arguments
    /// * `repository` - Store to purge
    /// * `interval` - Time between sweeps
    /// * `store_timeout` - Upper bound for a single `delete_expired` call
    pub fn new(repository: Arc<R>, interval: Duration, store_timeout: Duration) -> Self {
        Self {
            repository,
            interval,
            store_timeout,
        }
    }

    /// Run a single sweep
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Number of rows removed
    /// * `Err(DomainError)` - Store failure or timeout
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        let deleted = tokio::time::timeout(self.store_timeout, self.repository.delete_expired())
            .await
            .map_err(|_| DomainError::timeout("refresh_token_store.delete_expired"))??;

        if deleted > 0 {
            info!(deleted = deleted, "Deleted expired refresh tokens");
        }

        Ok(CleanupResult {
            expired_tokens_deleted: deleted,
        })
    }

    /// Start the sweeper as a background task
    ///
    /// The task runs for the lifetime of the process; the first sweep happens
    /// immediately.
    pub fn start_background_task(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                interval_secs = self.interval.as_secs(),
                "Refresh token sweeper started"
            );

            let mut interval_timer = tokio::time::interval(self.interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!(error = %e, "Refresh token sweep failed");
                }
            }
        })
    }
}

/// Result of a sweep
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired refresh tokens deleted
    pub expired_tokens_deleted: usize,
}
