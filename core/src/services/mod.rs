//! Business services containing domain logic and use cases.

pub mod auth;
pub mod clock;
pub mod credential;
pub mod random;
pub mod rate_limit;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, DelayResponseService};
pub use clock::{Clock, ManualClock, SystemClock};
pub use credential::CredentialVerifier;
pub use random::{OsRandom, RandomSource, SeededRandom};
pub use rate_limit::{RateClass, RateLimitPolicy, SlidingWindowRateLimiter};
pub use token::{
    hash_refresh_token, CleanupResult, RefreshTokenSweeper, TokenIssuer, TokenServiceConfig,
    TokenValidator,
};
