use serde::{Deserialize, Serialize};

/// Retry policy for chat generation.
///
/// Delay before attempt `n + 1` is `min(base * 2^n + jitter, max_delay)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first (valid range: 1-10).
    pub max_attempts: u32,
    pub base_delay_secs: f64,
    pub max_delay_secs: f64,
    /// Upper bound of the uniform random jitter added to each backoff.
    pub jitter_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 1.0,
            max_delay_secs: 60.0,
            jitter_secs: 0.3,
        }
    }
}
