//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants;
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Session management configuration
    #[serde(default)]
    pub session: SessionSettings,

    /// Case submission boundary configuration
    #[serde(default)]
    pub submission: SubmissionSettings,

    /// Directory with domain YAML tables; embedded defaults when unset
    #[serde(default)]
    pub domain_config_dir: Option<String>,
}

/// Session management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Inactivity window in seconds before a session is evicted
    #[serde(default = "default_session_timeout_secs")]
    pub timeout_secs: u64,

    /// Eviction sweep interval in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Maximum concurrently tracked sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_session_timeout_secs() -> u64 {
    constants::SESSION_TIMEOUT.as_secs()
}

fn default_sweep_interval_secs() -> u64 {
    constants::SESSION_SWEEP_INTERVAL.as_secs()
}

fn default_max_sessions() -> usize {
    constants::MAX_SESSIONS
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_session_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

/// Case submission boundary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSettings {
    /// Lower bound of the simulated latency in milliseconds
    #[serde(default = "default_latency_min_ms")]
    pub latency_min_ms: u64,

    /// Upper bound of the simulated latency in milliseconds
    #[serde(default = "default_latency_max_ms")]
    pub latency_max_ms: u64,

    /// External-call deadline in milliseconds before degrading to the
    /// knowledge-base-only response
    #[serde(default = "default_external_timeout_ms")]
    pub external_timeout_ms: u64,
}

fn default_latency_min_ms() -> u64 {
    constants::SUBMIT_LATENCY_MIN_MS
}

fn default_latency_max_ms() -> u64 {
    constants::SUBMIT_LATENCY_MAX_MS
}

fn default_external_timeout_ms() -> u64 {
    constants::EXTERNAL_CALL_TIMEOUT.as_millis() as u64
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            latency_min_ms: default_latency_min_ms(),
            latency_max_ms: default_latency_max_ms(),
            external_timeout_ms: default_external_timeout_ms(),
        }
    }
}

impl Settings {
    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.submission.latency_min_ms > self.submission.latency_max_ms {
            return Err(ConfigError::InvalidValue {
                field: "submission.latency_min_ms".to_string(),
                message: "minimum latency exceeds maximum".to_string(),
            });
        }
        if self.session.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.timeout_secs".to_string(),
                message: "session timeout must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings from an optional file plus `SALES_ASSIST_` env overrides
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        builder = builder.add_source(File::from(path));
    }

    let config = builder
        .add_source(Environment::with_prefix("SALES_ASSIST").separator("__"))
        .build()?;

    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;

    tracing::debug!(
        session_timeout_secs = settings.session.timeout_secs,
        max_sessions = settings.session.max_sessions,
        "Loaded settings"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.session.timeout_secs, 1800);
    }

    #[test]
    fn test_validate_rejects_inverted_latency() {
        let mut settings = Settings::default();
        settings.submission.latency_min_ms = 2_000;
        settings.submission.latency_max_ms = 100;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings.session.max_sessions, 500);
    }
}
