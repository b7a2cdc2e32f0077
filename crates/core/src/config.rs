//! Client configuration

use std::time::Duration;

use crate::{DEFAULT_HISTORY_LENGTH, DEFAULT_POLL_INTERVAL_MS};

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Idle time after which new messages are polled
    pub poll_interval: Duration,

    /// Prompt shown in front of the input line
    pub prompt: String,

    /// Number of committed lines kept for recall
    pub history_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            prompt: "> ".to_string(),
            history_len: DEFAULT_HISTORY_LENGTH,
        }
    }
}

impl ClientConfig {
    /// Set idle poll interval
    ///
    /// Zero is bumped to one millisecond so the loop still waits on its
    /// other sources between polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_history_len(mut self, len: usize) -> Self {
        self.history_len = len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(200));
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.history_len, 50);
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::default()
            .with_poll_interval(Duration::from_millis(50))
            .with_prompt("chat> ")
            .with_history_len(5);
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.prompt, "chat> ");
        assert_eq!(config.history_len, 5);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = ClientConfig::default().with_poll_interval(Duration::ZERO);
        assert_eq!(config.poll_interval, Duration::from_millis(1));
    }
}
