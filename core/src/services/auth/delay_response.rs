//! Fixed response delay for failed logins
//!
//! Every failed login waits the same configured time whether the account
//! exists or not, so response timing does not reveal registered emails.

use std::time::Duration;
use tracing::debug;

/// Applies the configured delay to failed authentication attempts
#[derive(Debug, Clone)]
pub struct DelayResponseService {
    delay: Duration,
}

impl DelayResponseService {
    /// Create new delay response service
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The delay applied to each failure
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Apply delay asynchronously
    pub async fn apply_delay(&self) {
        if self.delay.is_zero() {
            return;
        }
        debug!(
            delay_ms = self.delay.as_millis() as u64,
            "Delaying failed authentication response"
        );
        tokio::time::sleep(self.delay).await;
    }
}
