// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error kinds returned by the validators, the rate limiter and config loading.
//!
//! Every variant is an expected, user-correctable condition and is returned
//! as a typed result. The sanitizer has no error type.

use std::time::Duration;
use thiserror::Error;

/// Message text validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Message is empty")]
    EmptyInput,

    #[error("Message is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("Message must be text")]
    InvalidType,
}

/// Attachment validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("File is too large (maximum {max_mb} MB)")]
    TooLarge { max_mb: u64 },

    #[error("File type {mime_type:?} is not allowed")]
    TypeNotAllowed { mime_type: String },

    #[error("File extension of {name:?} is not allowed")]
    ExtensionNotAllowed { name: String },
}

/// Rate limit rejections.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Too many messages this minute, retry in {}s", ceil_secs(.retry_after))]
    MinuteLimitExceeded { retry_after: Duration },

    #[error("Too many messages this hour, locked for {}s", ceil_secs(.retry_after))]
    HourLimitExceeded { retry_after: Duration },

    #[error("Sending is temporarily blocked, retry in {}s", ceil_secs(.retry_after))]
    Blocked { retry_after: Duration },
}

/// Configuration defects detected at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Tag allowlist is empty")]
    EmptyAllowlist,

    #[error("File type allowlist is empty")]
    EmptyFileTypes,

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Malformed configuration document: {0}")]
    Parse(String),
}

/// Any rejection the pipeline can produce.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    RateLimit(#[from] RateLimitError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GuardError>;

impl ValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "EMPTY_INPUT",
            Self::TooLong { .. } => "TOO_LONG",
            Self::InvalidType => "INVALID_TYPE",
        }
    }
}

impl FileError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooLarge { .. } => "FILE_TOO_LARGE",
            Self::TypeNotAllowed { .. } => "TYPE_NOT_ALLOWED",
            Self::ExtensionNotAllowed { .. } => "EXTENSION_NOT_ALLOWED",
        }
    }
}

impl RateLimitError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MinuteLimitExceeded { .. } => "MINUTE_LIMIT_EXCEEDED",
            Self::HourLimitExceeded { .. } => "HOUR_LIMIT_EXCEEDED",
            Self::Blocked { .. } => "BLOCKED",
        }
    }

    /// Time until sending may succeed again.
    pub fn retry_after(&self) -> Duration {
        match self {
            Self::MinuteLimitExceeded { retry_after }
            | Self::HourLimitExceeded { retry_after }
            | Self::Blocked { retry_after } => *retry_after,
        }
    }

    /// Retry delay rounded up to whole seconds, as shown to users.
    pub fn retry_after_secs(&self) -> u64 {
        ceil_secs(&self.retry_after())
    }
}

impl GuardError {
    /// Stable machine-readable code of the underlying kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.code(),
            Self::File(e) => e.code(),
            Self::RateLimit(e) => e.code(),
            Self::Config(_) => "CONFIG",
        }
    }
}

fn ceil_secs(d: &Duration) -> u64 {
    let secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
