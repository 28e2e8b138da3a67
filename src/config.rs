//! Controller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};

use crate::history::FrameHistory;

/// When a send call returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// As soon as the frame is queued.
    Queued,
    /// Once the frame has been written to the link.
    #[default]
    Drained,
}

/// Settings for a [`Controller`](crate::Controller) and its worker.
///
/// Durations are (de)serialized as milliseconds.
///
/// ```
/// use std::time::Duration;
/// use govee_ble_rs::{ControllerConfig, DeliveryMode};
///
/// let config: ControllerConfig =
///     serde_json::from_str(r#"{"keep_alive_interval": 2000, "delivery": "queued"}"#).unwrap();
/// assert_eq!(config.keep_alive_interval, Duration::from_secs(2));
/// assert_eq!(config.delivery, DeliveryMode::Queued);
/// assert_eq!(config.transmit_timeout, None);
/// ```
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Idle time after which a keep-alive frame is sent.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub keep_alive_interval: Duration,
    /// Default delivery mode of the controller's send calls.
    pub delivery: DeliveryMode,
    /// Upper bound on a single frame write. `None` waits forever.
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmit_timeout: Option<Duration>,
    /// Number of transmitted frames kept for diagnostics.
    pub history_size: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            keep_alive_interval: Self::KEEP_ALIVE_INTERVAL,
            delivery: DeliveryMode::default(),
            transmit_timeout: None,
            history_size: FrameHistory::DEFAULT_MAX_ENTRIES,
        }
    }
}

impl ControllerConfig {
    pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(3);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = interval;
        self
    }

    pub fn delivery(mut self, mode: DeliveryMode) -> Self {
        self.delivery = mode;
        self
    }

    pub fn transmit_timeout(mut self, timeout: Duration) -> Self {
        self.transmit_timeout = Some(timeout);
        self
    }

    pub fn history_size(mut self, size: usize) -> Self {
        self.history_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.keep_alive_interval, Duration::from_secs(3));
        assert_eq!(config.delivery, DeliveryMode::Drained);
        assert!(config.transmit_timeout.is_none());
    }

    #[test]
    fn test_serialize_skips_unset_timeout() {
        let json = serde_json::to_value(ControllerConfig::default()).unwrap();
        assert_eq!(json["keep_alive_interval"], 3000);
        assert_eq!(json["delivery"], "drained");
        assert!(json.get("transmit_timeout").is_none());

        let config = ControllerConfig::new().transmit_timeout(Duration::from_millis(250));
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["transmit_timeout"], 250);
    }
}
