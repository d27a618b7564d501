//! Process-local sliding-window rate limiter

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::services::clock::Clock;

/// Length of the trailing window every limit is counted over
pub const RATE_LIMIT_WINDOW_SECS: i64 = 60;

/// Which limit applies to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateClass {
    /// Login, register and refresh
    Auth,
    /// Everything else
    General,
}

/// Per-minute limits for each class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub auth_per_minute: u32,
    pub general_per_minute: u32,
}

impl RateLimitPolicy {
    pub fn new(auth_per_minute: u32, general_per_minute: u32) -> Self {
        Self {
            auth_per_minute,
            general_per_minute,
        }
    }

    pub fn limit_for(&self, class: RateClass) -> u32 {
        match class {
            RateClass::Auth => self.auth_per_minute,
            RateClass::General => self.general_per_minute,
        }
    }
}

/// Sliding-window limiter keyed by client identity
///
/// Each client owns a queue of request instants inside the trailing window.
/// One reader/writer lock guards the whole map, which is the main contention
/// point under load; limits are not shared across server instances.
pub struct SlidingWindowRateLimiter {
    buckets: RwLock<HashMap<String, VecDeque<DateTime<Utc>>>>,
    window: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl SlidingWindowRateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            window: chrono::Duration::seconds(RATE_LIMIT_WINDOW_SECS),
            clock,
        }
    }

    /// Admit or reject one request from `client_id`
    ///
    /// Entries older than the window are dropped first; the request is
    /// rejected when `limit` entries remain, otherwise it is recorded.
    pub fn is_allowed(&self, client_id: &str, limit: u32) -> bool {
        let now = self.clock.now();
        let window_start = now - self.window;

        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        let bucket = buckets.entry(client_id.to_owned()).or_default();

        while bucket.front().is_some_and(|t| *t <= window_start) {
            bucket.pop_front();
        }

        if bucket.len() >= limit as usize {
            return false;
        }

        bucket.push_back(now);
        true
    }

    /// Drop stale entries and remove clients with nothing left in the window
    ///
    /// Returns the number of buckets removed.
    pub fn sweep(&self) -> usize {
        let window_start = self.clock.now() - self.window;
        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        let before = buckets.len();

        buckets.retain(|_, bucket| {
            bucket.retain(|t| *t > window_start);
            !bucket.is_empty()
        });

        before - buckets.len()
    }

    /// Number of clients currently tracked
    pub fn bucket_count(&self) -> usize {
        self.buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Requests recorded for `client_id` inside the current window
    pub fn recorded(&self, client_id: &str) -> usize {
        let window_start = self.clock.now() - self.window;
        self.buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(client_id)
            .map(|bucket| bucket.iter().filter(|t| **t > window_start).count())
            .unwrap_or(0)
    }

    /// Spawn the periodic sweep
    ///
    /// The task holds only a weak reference and ends once the limiter is dropped.
    pub fn start_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let limiter: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "Rate limit sweeper started");
            let mut timer = tokio::time::interval(interval);
            timer.tick().await;

            loop {
                timer.tick().await;
                let Some(limiter) = limiter.upgrade() else {
                    break;
                };
                let removed = limiter.sweep();
                if removed > 0 {
                    debug!(removed = removed, "Swept idle rate limit buckets");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::ManualClock;
    use chrono::Duration as ChronoDuration;

    fn limiter() -> (Arc<ManualClock>, SlidingWindowRateLimiter) {
        let clock = Arc::new(ManualClock::default());
        let limiter = SlidingWindowRateLimiter::new(clock.clone());
        (clock, limiter)
    }

    #[test]
    fn test_limit_enforced_per_client() {
        let (_clock, limiter) = limiter();

        for _ in 0..3 {
            assert!(limiter.is_allowed("10.0.0.1", 3));
        }
        assert!(!limiter.is_allowed("10.0.0.1", 3));
        assert!(limiter.is_allowed("10.0.0.2", 3));
    }

    #[test]
    fn test_rejected_requests_are_not_recorded() {
        let (_clock, limiter) = limiter();

        assert!(limiter.is_allowed("c", 1));
        assert!(!limiter.is_allowed("c", 1));
        assert!(!limiter.is_allowed("c", 1));
        assert_eq!(limiter.recorded("c"), 1);
    }

    #[test]
    fn test_window_slides() {
        let (clock, limiter) = limiter();

        assert!(limiter.is_allowed("c", 2));
        clock.advance(ChronoDuration::seconds(30));
        assert!(limiter.is_allowed("c", 2));
        assert!(!limiter.is_allowed("c", 2));

        // First entry leaves the window exactly 60s after it was recorded
        clock.advance(ChronoDuration::seconds(30));
        assert!(limiter.is_allowed("c", 2));
        assert!(!limiter.is_allowed("c", 2));
    }

    #[test]
    fn test_sweep_removes_idle_buckets() {
        let (clock, limiter) = limiter();

        limiter.is_allowed("old", 5);
        clock.advance(ChronoDuration::seconds(45));
        limiter.is_allowed("recent", 5);
        assert_eq!(limiter.bucket_count(), 2);

        clock.advance(ChronoDuration::seconds(20));
        assert_eq!(limiter.sweep(), 1);
        assert_eq!(limiter.bucket_count(), 1);
        assert_eq!(limiter.recorded("recent"), 1);
        assert_eq!(limiter.recorded("old"), 0);
    }

    #[test]
    fn test_policy_selects_limit() {
        let policy = RateLimitPolicy::new(5, 60);
        assert_eq!(policy.limit_for(RateClass::Auth), 5);
        assert_eq!(policy.limit_for(RateClass::General), 60);
    }

    #[test]
    fn test_concurrent_callers_never_exceed_limit() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::default());
        let limiter = Arc::new(SlidingWindowRateLimiter::new(clock));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || {
                    (0..50).filter(|_| limiter.is_allowed("shared", 100)).count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 100);
    }

    #[tokio::test]
    async fn test_sweeper_stops_when_limiter_dropped() {
        let (_clock, limiter) = limiter();
        let limiter = Arc::new(limiter);
        let handle = limiter.start_sweeper(Duration::from_millis(10));

        drop(limiter);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
