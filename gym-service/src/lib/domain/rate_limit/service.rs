use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;

use crate::domain::rate_limit::errors::RateLimitError;
use crate::domain::rate_limit::models::RateLimitQuota;
use crate::domain::rate_limit::ports::RateLimitStore;

/// Sliding-window rate limiter.
///
/// Counts persisted request events in the trailing window and rejects once
/// the quota is reached. The rejected attempt itself is not recorded, so a
/// client hammering a full window does not push its own reset further out.
///
/// Count and insert are two store calls; a burst racing the boundary may
/// admit slightly more than `limit` events. Closing that race needs a
/// conditional increment in the store, which the port shape allows.
pub struct RateLimiter<S>
where
    S: RateLimitStore,
{
    store: Arc<S>,
}

impl<S> RateLimiter<S>
where
    S: RateLimitStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Admit or reject one request for `identifier` on `endpoint`.
    ///
    /// # Errors
    /// * `Exceeded` - Quota reached within the window
    /// * `DatabaseError` - Store operation failed
    pub async fn enforce(
        &self,
        identifier: &str,
        endpoint: &str,
        quota: RateLimitQuota,
    ) -> Result<(), RateLimitError> {
        let window_start = Utc::now() - Duration::seconds(quota.window_seconds);

        let requests_in_window = self
            .store
            .count_since(identifier, endpoint, window_start)
            .await?;

        if requests_in_window >= quota.limit {
            tracing::warn!(
                identifier,
                endpoint,
                limit = quota.limit,
                "Rate limit exceeded"
            );
            return Err(RateLimitError::Exceeded);
        }

        self.store.record(identifier, endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::DateTime;
    use mockall::mock;

    use super::*;

    mock! {
        pub TestRateLimitStore {}

        #[async_trait]
        impl RateLimitStore for TestRateLimitStore {
            async fn count_since(
                &self,
                identifier: &str,
                endpoint: &str,
                since: DateTime<Utc>,
            ) -> Result<i64, RateLimitError>;
            async fn record(&self, identifier: &str, endpoint: &str) -> Result<(), RateLimitError>;
        }
    }

    #[tokio::test]
    async fn test_admits_below_limit_and_records() {
        let mut store = MockTestRateLimitStore::new();
        store
            .expect_count_since()
            .withf(|identifier, endpoint, since| {
                identifier == "1.2.3.4" && endpoint == "auth/login" && *since <= Utc::now()
            })
            .times(1)
            .returning(|_, _, _| Ok(9));
        store
            .expect_record()
            .withf(|identifier, endpoint| identifier == "1.2.3.4" && endpoint == "auth/login")
            .times(1)
            .returning(|_, _| Ok(()));

        let limiter = RateLimiter::new(Arc::new(store));

        limiter
            .enforce("1.2.3.4", "auth/login", RateLimitQuota::new(10, 60))
            .await
            .expect("request should be admitted");
    }

    #[tokio::test]
    async fn test_rejects_at_limit_without_recording() {
        let mut store = MockTestRateLimitStore::new();
        store
            .expect_count_since()
            .times(1)
            .returning(|_, _, _| Ok(10));
        // The rejected attempt must not be recorded
        store.expect_record().times(0);

        let limiter = RateLimiter::new(Arc::new(store));

        let result = limiter
            .enforce("1.2.3.4", "auth/login", RateLimitQuota::new(10, 60))
            .await;
        assert!(matches!(result, Err(RateLimitError::Exceeded)));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut store = MockTestRateLimitStore::new();
        store
            .expect_count_since()
            .times(1)
            .returning(|_, _, _| Err(RateLimitError::DatabaseError("connection lost".to_string())));

        let limiter = RateLimiter::new(Arc::new(store));

        let result = limiter
            .enforce("1.2.3.4", "auth/login", RateLimitQuota::new(10, 60))
            .await;
        assert!(matches!(result, Err(RateLimitError::DatabaseError(_))));
    }
}
