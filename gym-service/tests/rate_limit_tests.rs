use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use gym_service::domain::rate_limit::errors::RateLimitError;
use gym_service::domain::rate_limit::models::RateLimitQuota;
use gym_service::domain::rate_limit::ports::RateLimitStore;
use gym_service::domain::rate_limit::service::RateLimiter;

mod common;

use common::InMemoryRateLimitStore;

#[tokio::test]
async fn test_requests_beyond_quota_rejected() {
    let store = Arc::new(InMemoryRateLimitStore::default());
    let limiter = RateLimiter::new(Arc::clone(&store));
    let quota = RateLimitQuota::new(3, 60);

    for _ in 0..3 {
        limiter
            .enforce("10.0.0.1", "auth/login", quota)
            .await
            .expect("Request within quota rejected");
    }

    let result = limiter.enforce("10.0.0.1", "auth/login", quota).await;
    assert!(matches!(result, Err(RateLimitError::Exceeded)));
}

#[tokio::test]
async fn test_rejected_attempt_not_recorded() {
    let store = Arc::new(InMemoryRateLimitStore::default());
    let limiter = RateLimiter::new(Arc::clone(&store));
    let quota = RateLimitQuota::new(1, 60);

    limiter
        .enforce("10.0.0.1", "auth/login", quota)
        .await
        .expect("First request rejected");

    for _ in 0..5 {
        let result = limiter.enforce("10.0.0.1", "auth/login", quota).await;
        assert!(matches!(result, Err(RateLimitError::Exceeded)));
    }

    // Rejections must not extend the window by adding events of their own.
    let window_start = Utc::now() - chrono::Duration::seconds(60);
    let count = store
        .count_since("10.0.0.1", "auth/login", window_start)
        .await
        .expect("Count failed");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_identities_and_endpoints_isolated() {
    let store = Arc::new(InMemoryRateLimitStore::default());
    let limiter = RateLimiter::new(store);
    let quota = RateLimitQuota::new(1, 60);

    limiter
        .enforce("10.0.0.1", "auth/login", quota)
        .await
        .expect("First request rejected");

    let same_identity = limiter.enforce("10.0.0.1", "auth/login", quota).await;
    assert!(matches!(same_identity, Err(RateLimitError::Exceeded)));

    // A different client and a different endpoint each have their own budget.
    limiter
        .enforce("10.0.0.2", "auth/login", quota)
        .await
        .expect("Other identity throttled");
    limiter
        .enforce("10.0.0.1", "auth/refresh", quota)
        .await
        .expect("Other endpoint throttled");
}

#[tokio::test]
async fn test_window_slides_open_again() {
    let store = Arc::new(InMemoryRateLimitStore::default());
    let limiter = RateLimiter::new(store);
    let quota = RateLimitQuota::new(2, 1);

    limiter
        .enforce("10.0.0.1", "auth/login", quota)
        .await
        .expect("First request rejected");
    limiter
        .enforce("10.0.0.1", "auth/login", quota)
        .await
        .expect("Second request rejected");

    let exhausted = limiter.enforce("10.0.0.1", "auth/login", quota).await;
    assert!(matches!(exhausted, Err(RateLimitError::Exceeded)));

    // Once the earlier events age out of the window, capacity returns.
    tokio::time::sleep(Duration::from_millis(1200)).await;

    limiter
        .enforce("10.0.0.1", "auth/login", quota)
        .await
        .expect("Request after window reset rejected");
}
