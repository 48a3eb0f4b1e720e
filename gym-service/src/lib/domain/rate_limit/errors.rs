use thiserror::Error;

/// Error type for rate-limit operations.
#[derive(Debug, Clone, Error)]
pub enum RateLimitError {
    #[error("Too many requests. Please try again later.")]
    Exceeded,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
