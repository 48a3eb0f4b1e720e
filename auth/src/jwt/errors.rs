use thiserror::Error;

/// Error type for token operations.
///
/// Verification failures deliberately collapse into the single
/// `InvalidToken` variant: callers (and therefore clients) cannot tell a
/// bad signature from an expired or malformed token, which keeps the API
/// from acting as an oracle for attackers probing stolen tokens.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Invalid token")]
    InvalidToken,
}
