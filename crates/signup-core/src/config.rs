//! Form configuration.

use std::time::Duration;

/// Storage key holding the serialized history.
pub const DEFAULT_STORAGE_KEY: &str = "signupHistory";
/// Number of signups kept in history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;
/// Simulated endpoint latency.
pub const DEFAULT_ENDPOINT_DELAY: Duration = Duration::from_millis(1_000);

/// Tunables for the signup form.
///
/// Defaults:
/// - history_capacity: 5
/// - storage_key: `"signupHistory"`
/// - endpoint_delay: 1000 ms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupConfig {
    /// Maximum number of records kept in history.
    pub history_capacity: usize,
    /// Key under which history is persisted.
    pub storage_key: String,
    /// Latency of the mock submission endpoint.
    pub endpoint_delay: Duration,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            endpoint_delay: DEFAULT_ENDPOINT_DELAY,
        }
    }
}

impl SignupConfig {
    /// Set the history capacity. Zero is clamped to one.
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self
    }

    /// Set the storage key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the mock endpoint latency.
    #[must_use]
    pub fn with_endpoint_delay(mut self, delay: Duration) -> Self {
        self.endpoint_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = SignupConfig::default();
        assert_eq!(cfg.history_capacity, 5);
        assert_eq!(cfg.storage_key, "signupHistory");
        assert_eq!(cfg.endpoint_delay, Duration::from_secs(1));
    }

    #[test]
    fn builders() {
        let cfg = SignupConfig::default()
            .with_history_capacity(0)
            .with_storage_key("k")
            .with_endpoint_delay(Duration::ZERO);
        assert_eq!(cfg.history_capacity, 1);
        assert_eq!(cfg.storage_key, "k");
        assert_eq!(cfg.endpoint_delay, Duration::ZERO);
    }
}
