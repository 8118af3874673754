//! Per-node service configuration
//!
//! Shared read-only by the request handler, the strategies and the
//! transports once the node has started.

use std::{collections::HashMap, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Behavior knobs for a single node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Node identity, used in logs and injected-failure messages
    #[serde(default)]
    pub id: String,

    /// Probability (0-100) that a request fails before reaching the strategy
    #[serde(default)]
    pub percent_failure: u8,

    /// Artificial latency added to every request
    #[serde(default, with = "humantime_serde")]
    pub sleep: Duration,

    /// Wrap every downstream client so sends return immediately
    #[serde(default)]
    pub fire_and_forget: bool,

    /// Stop the node after this many requests; 0 disables the counter
    #[serde(default)]
    pub terminate_after: u64,

    /// Deadline for each downstream call
    #[serde(default = "default_downstream_timeout", with = "humantime_serde")]
    pub downstream_timeout: Duration,

    /// Free-form, strategy-specific parameters
    #[serde(default)]
    pub extra_arguments: HashMap<String, String>,
}

fn default_downstream_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            percent_failure: 0,
            sleep: Duration::ZERO,
            fire_and_forget: false,
            terminate_after: 0,
            downstream_timeout: default_downstream_timeout(),
            extra_arguments: HashMap::new(),
        }
    }
}

impl ServiceConfig {
    /// Create a configuration with the given node id and defaults elsewhere
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the failure percentage
    #[must_use]
    pub const fn with_percent_failure(mut self, percent: u8) -> Self {
        self.percent_failure = percent;
        self
    }

    /// Set the artificial latency
    #[must_use]
    pub const fn with_sleep(mut self, sleep: Duration) -> Self {
        self.sleep = sleep;
        self
    }

    /// Set the auto-termination threshold
    #[must_use]
    pub const fn with_terminate_after(mut self, count: u64) -> Self {
        self.terminate_after = count;
        self
    }

    /// Enable or disable fire-and-forget clients
    #[must_use]
    pub const fn with_fire_and_forget(mut self, enabled: bool) -> Self {
        self.fire_and_forget = enabled;
        self
    }

    /// Add a strategy-specific parameter
    #[must_use]
    pub fn with_extra_argument(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_arguments.insert(key.into(), value.into());
        self
    }

    /// Look up a strategy-specific parameter
    pub fn extra_argument(&self, key: &str) -> Option<&str> {
        self.extra_arguments.get(key).map(String::as_str)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.percent_failure > 100 {
            return Err(ApplicationError::Configuration(format!(
                "percent_failure must be between 0 and 100, got {}",
                self.percent_failure
            )));
        }
        Ok(())
    }
}

/// Serde helper for humantime durations.
mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServiceConfig::default();
        assert!(config.id.is_empty());
        assert_eq!(config.percent_failure, 0);
        assert_eq!(config.sleep, Duration::ZERO);
        assert!(!config.fire_and_forget);
        assert_eq!(config.terminate_after, 0);
        assert_eq!(config.downstream_timeout, Duration::from_secs(60));
    }

    #[test]
    fn builder_sets_fields() {
        let config = ServiceConfig::new("node-a")
            .with_percent_failure(25)
            .with_sleep(Duration::from_millis(10))
            .with_terminate_after(3)
            .with_fire_and_forget(true)
            .with_extra_argument("response-text", "BANANA");

        assert_eq!(config.id, "node-a");
        assert_eq!(config.percent_failure, 25);
        assert_eq!(config.sleep, Duration::from_millis(10));
        assert_eq!(config.terminate_after, 3);
        assert!(config.fire_and_forget);
        assert_eq!(config.extra_argument("response-text"), Some("BANANA"));
        assert_eq!(config.extra_argument("missing"), None);
    }

    #[test]
    fn validate_rejects_out_of_range_percentage() {
        assert!(ServiceConfig::new("a").with_percent_failure(100).validate().is_ok());
        let err = ServiceConfig::new("a")
            .with_percent_failure(101)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }

    #[test]
    fn deserializes_human_durations() {
        let config: ServiceConfig = serde_json::from_str(
            r#"{"id":"x","sleep":"250ms","downstream_timeout":"5s","extra_arguments":{"url":"http://a"}}"#,
        )
        .unwrap();
        assert_eq!(config.sleep, Duration::from_millis(250));
        assert_eq!(config.downstream_timeout, Duration::from_secs(5));
        assert_eq!(config.extra_argument("url"), Some("http://a"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ServiceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn bad_duration_is_rejected() {
        let result: Result<ServiceConfig, _> = serde_json::from_str(r#"{"sleep":"soon"}"#);
        assert!(result.is_err());
    }
}
