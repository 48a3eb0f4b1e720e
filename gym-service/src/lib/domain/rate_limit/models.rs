/// Per-route rate-limit configuration.
///
/// Every route picks its own quota; there are no global defaults.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitQuota {
    /// Maximum admitted requests per window
    pub limit: i64,

    /// Trailing window length in seconds
    pub window_seconds: i64,
}

impl RateLimitQuota {
    pub const fn new(limit: i64, window_seconds: i64) -> Self {
        Self {
            limit,
            window_seconds,
        }
    }
}
