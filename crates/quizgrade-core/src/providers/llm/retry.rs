use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded retry for a single generation call.
///
/// A "model loading" response (HTTP 503) waits `backoff_unit_ms * (attempt + 1)`;
/// a transport error waits `transport_backoff_ms`. Any other failure is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit_ms: u64,
    pub transport_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit_ms: 10_000,
            transport_backoff_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts; used by tests and offline runs.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff_unit_ms: 0,
            transport_backoff_ms: 0,
        }
    }

    /// Wait after a 503 on zero-based `attempt`.
    pub fn loading_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_unit_ms.saturating_mul(u64::from(attempt) + 1))
    }

    pub fn transport_delay(&self) -> Duration {
        Duration::from_millis(self.transport_backoff_ms)
    }

    /// Whether another attempt follows zero-based `attempt`.
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_delay_grows_linearly() {
        let p = RetryPolicy::default();
        assert_eq!(p.loading_delay(0), Duration::from_secs(10));
        assert_eq!(p.loading_delay(1), Duration::from_secs(20));
        assert_eq!(p.loading_delay(2), Duration::from_secs(30));
        assert_eq!(p.transport_delay(), Duration::from_secs(2));
    }

    #[test]
    fn attempt_ceiling() {
        let p = RetryPolicy::default();
        assert!(p.has_next(0));
        assert!(p.has_next(1));
        assert!(!p.has_next(2));
        assert!(!RetryPolicy::immediate(1).has_next(0));
    }
}
