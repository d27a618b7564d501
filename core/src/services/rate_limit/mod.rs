//! Request admission control
//!
//! A sliding-window limiter keyed by client identity with two limit classes.

mod limiter;

pub use limiter::{RateClass, RateLimitPolicy, SlidingWindowRateLimiter, RATE_LIMIT_WINDOW_SECS};
