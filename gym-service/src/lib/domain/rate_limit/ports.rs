use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::rate_limit::errors::RateLimitError;

/// Persistence for request events, the backing data of the sliding window.
///
/// Events are append-only; old ones fall out of every window naturally and
/// never need explicit deletion.
#[async_trait]
pub trait RateLimitStore: Send + Sync + 'static {
    /// Count events for an identifier + endpoint pair at or after `since`.
    async fn count_since(
        &self,
        identifier: &str,
        endpoint: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, RateLimitError>;

    /// Append one request event stamped with the current time.
    async fn record(&self, identifier: &str, endpoint: &str) -> Result<(), RateLimitError>;
}
