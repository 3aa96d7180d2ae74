// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the content guard.
//!
//! Values normally come from the widget configuration object, either as a
//! JSON document ([`Config::from_json`]) or from environment variables
//! ([`Config::from_env`]). Anything missing falls back to the defaults below.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Message and attachment validation
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Per-session rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Message and attachment validation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum message length in characters after trimming (default: 1000)
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    /// Maximum attachment size in bytes (default: 10 MiB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Accepted attachment MIME types
    #[serde(default = "default_allowed_file_types")]
    pub allowed_file_types: Vec<String>,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum messages per trailing minute (default: 10)
    #[serde(default = "default_max_messages_per_minute")]
    pub max_messages_per_minute: u32,

    /// Maximum messages per trailing hour before lockout (default: 60)
    #[serde(default = "default_max_messages_per_hour")]
    pub max_messages_per_hour: u32,

    /// Lockout length after the hourly limit is hit, in seconds (default: 300)
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,

    /// Idle time after which a session's state is evicted, in seconds (default: 3600)
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metric name prefix (default: content_guard)
    #[serde(default = "default_metrics_namespace")]
    pub namespace: String,
}

// Default value functions
fn default_max_message_length() -> usize {
    1000
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_allowed_file_types() -> Vec<String> {
    [
        "image/jpeg",
        "image/png",
        "image/gif",
        "image/webp",
        "image/bmp",
        "application/pdf",
        "text/plain",
        "text/csv",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.ms-excel",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_true() -> bool {
    true
}

fn default_max_messages_per_minute() -> u32 {
    10
}

fn default_max_messages_per_hour() -> u32 {
    60
}

fn default_lockout_secs() -> u64 {
    300 // 5 minutes
}

fn default_session_idle_secs() -> u64 {
    3600
}

fn default_metrics_namespace() -> String {
    "content_guard".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validation: ValidationConfig::default(),
            rate_limit: RateLimitConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_message_length: default_max_message_length(),
            max_file_size: default_max_file_size(),
            allowed_file_types: default_allowed_file_types(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            max_messages_per_minute: default_max_messages_per_minute(),
            max_messages_per_hour: default_max_messages_per_hour(),
            lockout_secs: default_lockout_secs(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            namespace: default_metrics_namespace(),
        }
    }
}

impl RateLimitConfig {
    /// Get the lockout duration
    pub fn lockout_duration(&self) -> Duration {
        Duration::from_secs(self.lockout_secs)
    }

    /// Get the session idle timeout
    pub fn session_idle_duration(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

impl ValidationConfig {
    /// Attachment size limit in whole megabytes, as shown to users.
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size / (1024 * 1024)
    }
}

impl Config {
    /// Parse a JSON configuration document and validate it.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_json::from_str(document).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// - `MAX_MESSAGE_LENGTH`: max message length in characters (default: 1000)
    /// - `MAX_FILE_SIZE`: max attachment size in bytes (default: 10485760)
    /// - `ALLOWED_FILE_TYPES`: comma-separated MIME types
    /// - `RATE_LIMIT_ENABLED`: `true`/`false` (default: true)
    /// - `MAX_MESSAGES_PER_MINUTE` (default: 10)
    /// - `MAX_MESSAGES_PER_HOUR` (default: 60)
    /// - `LOCKOUT_SECS` (default: 300)
    /// - `METRICS_ENABLED`: `true`/`false` (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let config = Config {
            validation: ValidationConfig {
                max_message_length: parse_var(&lookup, "MAX_MESSAGE_LENGTH")
                    .unwrap_or(defaults.validation.max_message_length),
                max_file_size: parse_var(&lookup, "MAX_FILE_SIZE").unwrap_or(defaults.validation.max_file_size),
                allowed_file_types: lookup("ALLOWED_FILE_TYPES")
                    .map(|v| {
                        v.split(',')
                            .map(|t| t.trim().to_string())
                            .filter(|t| !t.is_empty())
                            .collect()
                    })
                    .unwrap_or(defaults.validation.allowed_file_types),
            },
            rate_limit: RateLimitConfig {
                enabled: parse_var(&lookup, "RATE_LIMIT_ENABLED").unwrap_or(defaults.rate_limit.enabled),
                max_messages_per_minute: parse_var(&lookup, "MAX_MESSAGES_PER_MINUTE")
                    .unwrap_or(defaults.rate_limit.max_messages_per_minute),
                max_messages_per_hour: parse_var(&lookup, "MAX_MESSAGES_PER_HOUR")
                    .unwrap_or(defaults.rate_limit.max_messages_per_hour),
                lockout_secs: parse_var(&lookup, "LOCKOUT_SECS").unwrap_or(defaults.rate_limit.lockout_secs),
                ..defaults.rate_limit
            },
            metrics: MetricsConfig {
                enabled: parse_var(&lookup, "METRICS_ENABLED").unwrap_or(defaults.metrics.enabled),
                ..defaults.metrics
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would leave a policy table empty or a
    /// limit meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validation.allowed_file_types.is_empty() {
            return Err(ConfigError::EmptyFileTypes);
        }
        if self.validation.max_message_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_message_length",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.rate_limit.enabled {
            if self.rate_limit.max_messages_per_minute == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "max_messages_per_minute",
                    reason: "must be greater than zero".to_string(),
                });
            }
            if self.rate_limit.max_messages_per_hour == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "max_messages_per_hour",
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Parse a variable, treating unparseable values as unset.
fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
