//! Client configuration
//!
//! Serializable settings for addressing tables and tuning retries.
//!
//! ```rust
//! use widecolumn_client::config::ClientConfig;
//!
//! let config = ClientConfig::from_json_str(
//!     r#"{"project_id": "acme", "instance_id": "prod", "retry": {"max_attempts": 5}}"#,
//! )
//! .unwrap();
//! assert_eq!(config.table_name("events"), "projects/acme/instances/prod/tables/events");
//! assert_eq!(config.retry.max_attempts, 5);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::defaults;
use crate::error::{ClientError, Result};
use crate::retry::{BackoffPolicy, RetryableCodes};
use crate::status::StatusCode;

/// Retry tuning. Durations are expressed in microseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_us: u64,
    pub max_jitter_us: u64,
    pub max_delay_us: u64,
    pub retryable_codes: Vec<StatusCode>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let micros = |d: Duration| u64::try_from(d.as_micros()).unwrap_or(u64::MAX);
        Self {
            max_attempts: defaults::retry::MAX_ATTEMPTS,
            base_delay_us: micros(defaults::retry::BASE_DELAY),
            max_jitter_us: micros(defaults::retry::MAX_JITTER),
            max_delay_us: micros(defaults::retry::MAX_DELAY),
            retryable_codes: defaults::retry::RETRYABLE_CODES.to_vec(),
        }
    }
}

impl RetrySettings {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_retryable_codes(mut self, codes: impl IntoIterator<Item = StatusCode>) -> Self {
        self.retryable_codes = codes.into_iter().collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(ClientError::ConfigError(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.max_delay_us < self.base_delay_us {
            return Err(ClientError::ConfigError(format!(
                "retry.max_delay_us ({}) is below retry.base_delay_us ({})",
                self.max_delay_us, self.base_delay_us
            )));
        }
        Ok(())
    }

    pub fn to_policy(&self) -> BackoffPolicy {
        BackoffPolicy::from(self)
    }
}

impl From<&RetrySettings> for BackoffPolicy {
    fn from(settings: &RetrySettings) -> Self {
        BackoffPolicy::new()
            .with_max_attempts(settings.max_attempts)
            .with_base_delay(Duration::from_micros(settings.base_delay_us))
            .with_max_jitter(Duration::from_micros(settings.max_jitter_us))
            .with_max_delay(Duration::from_micros(settings.max_delay_us))
            .with_retryable_codes(RetryableCodes::new(settings.retryable_codes.iter().copied()))
    }
}

/// Where tables live and how calls against them are retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub project_id: String,
    pub instance_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_profile_id: Option<String>,
    #[serde(default)]
    pub retry: RetrySettings,
}

impl ClientConfig {
    pub fn new(project_id: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            instance_id: instance_id.into(),
            app_profile_id: None,
            retry: RetrySettings::default(),
        }
    }

    pub fn with_app_profile_id(mut self, app_profile_id: impl Into<String>) -> Self {
        self.app_profile_id = Some(app_profile_id.into());
        self
    }

    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(ClientError::ConfigError("project_id is empty".to_string()));
        }
        if self.instance_id.trim().is_empty() {
            return Err(ClientError::ConfigError("instance_id is empty".to_string()));
        }
        self.retry.validate()
    }

    /// Fully qualified table path.
    pub fn table_name(&self, table_id: &str) -> String {
        format!(
            "projects/{}/instances/{}/tables/{}",
            self.project_id, self.instance_id, table_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_default_policy() {
        assert_eq!(RetrySettings::default().to_policy(), BackoffPolicy::default());
    }

    #[test]
    fn missing_retry_section_uses_defaults() {
        let config = ClientConfig::from_json_str(r#"{"project_id":"p","instance_id":"i"}"#).unwrap();
        assert_eq!(config.retry, RetrySettings::default());
        assert_eq!(config.app_profile_id, None);
    }

    #[test]
    fn retryable_codes_parse_from_symbols() {
        let config = ClientConfig::from_json_str(
            r#"{"project_id":"p","instance_id":"i","retry":{"retryable_codes":["UNAVAILABLE","INTERNAL"]}}"#,
        )
        .unwrap();
        let policy = config.retry.to_policy();
        assert!(policy.is_retryable(StatusCode::Internal));
        assert!(!policy.is_retryable(StatusCode::Aborted));
    }

    #[test]
    fn invalid_documents_are_rejected() {
        assert!(matches!(
            ClientConfig::from_json_str("not json"),
            Err(ClientError::JsonError(_))
        ));
        assert!(matches!(
            ClientConfig::from_json_str(r#"{"project_id":"","instance_id":"i"}"#),
            Err(ClientError::ConfigError(_))
        ));
        assert!(matches!(
            ClientConfig::from_json_str(
                r#"{"project_id":"p","instance_id":"i","retry":{"max_attempts":0}}"#
            ),
            Err(ClientError::ConfigError(_))
        ));
        assert!(matches!(
            ClientConfig::from_json_str(
                r#"{"project_id":"p","instance_id":"i","retry":{"base_delay_us":10,"max_delay_us":5}}"#
            ),
            Err(ClientError::ConfigError(_))
        ));
    }

    #[test]
    fn builder_methods() {
        let config = ClientConfig::new("p", "i")
            .with_app_profile_id("batch")
            .with_retry(RetrySettings::default().with_max_attempts(1));
        assert_eq!(config.app_profile_id.as_deref(), Some("batch"));
        assert_eq!(config.retry.max_attempts, 1);
        assert!(config.validate().is_ok());
    }
}
