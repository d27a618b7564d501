use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use uuid::Uuid;

use super::*;
use crate::domain::RefreshToken;
use crate::errors::DomainError;
use crate::repositories::{MockRefreshTokenRepository, RefreshTokenRepository};
use crate::services::token::RefreshTokenSweeper;

#[tokio::test]
async fn test_sweep_removes_only_expired_rows() {
    let clock = manual_clock();
    let repo = Arc::new(MockRefreshTokenRepository::new(clock.clone()));
    let user_id = Uuid::new_v4();

    repo.create(RefreshToken::new(user_id, "a".repeat(64), start(), Duration::hours(1)))
        .await
        .unwrap();
    repo.create(RefreshToken::new(user_id, "b".repeat(64), start(), Duration::days(7)))
        .await
        .unwrap();

    clock.advance(Duration::hours(2));
    let sweeper = RefreshTokenSweeper::new(repo.clone(), StdDuration::from_secs(3600), StdDuration::from_secs(1));

    let result = sweeper.run_cleanup().await.unwrap();
    assert_eq!(result.expired_tokens_deleted, 1);
    assert_eq!(repo.count().await, 1);

    let again = sweeper.run_cleanup().await.unwrap();
    assert_eq!(again.expired_tokens_deleted, 0);
}

#[tokio::test]
async fn test_sweep_times_out_on_slow_store() {
    let repo = Arc::new(
        MockRefreshTokenRepository::new(manual_clock()).with_latency(StdDuration::from_millis(200)),
    );
    let sweeper = RefreshTokenSweeper::new(repo, StdDuration::from_secs(3600), StdDuration::from_millis(20));

    let err = sweeper.run_cleanup().await.unwrap_err();
    assert!(matches!(err, DomainError::Timeout { .. }));
    assert!(err.is_retryable());
}
