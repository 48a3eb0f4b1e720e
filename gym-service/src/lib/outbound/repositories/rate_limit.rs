use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::rate_limit::errors::RateLimitError;
use crate::domain::rate_limit::ports::RateLimitStore;

pub struct PostgresRateLimitStore {
    pool: PgPool,
}

impl PostgresRateLimitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLimitStore for PostgresRateLimitStore {
    async fn count_since(
        &self,
        identifier: &str,
        endpoint: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, RateLimitError> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM rate_limit_events
            WHERE identifier = $1 AND endpoint = $2 AND created_at >= $3
            "#,
        )
        .bind(identifier)
        .bind(endpoint)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RateLimitError::DatabaseError(e.to_string()))
    }

    async fn record(&self, identifier: &str, endpoint: &str) -> Result<(), RateLimitError> {
        sqlx::query(
            r#"
            INSERT INTO rate_limit_events (identifier, endpoint)
            VALUES ($1, $2)
            "#,
        )
        .bind(identifier)
        .bind(endpoint)
        .execute(&self.pool)
        .await
        .map_err(|e| RateLimitError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
