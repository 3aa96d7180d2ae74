// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Message and attachment validator.
//!
//! Enforces shape only, before anything reaches the network:
//! - Message text is a string, non-empty after trimming, and within length
//! - Attachments are within the size limit
//! - Attachment MIME type and file extension are both allowlisted
//!
//! Dangerous markup is not filtered here; that happens at render time in
//! the sanitizer.

use crate::config::ValidationConfig;
use crate::error::{FileError, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File extensions accepted for attachments, independent of MIME type.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".pdf", ".txt", ".csv", ".doc", ".docx",
    ".xls", ".xlsx",
];

/// Metadata of an attachment selected for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    /// Size in bytes
    pub size: u64,
    /// Declared MIME type
    #[serde(rename = "type")]
    pub mime_type: String,
    /// File name as picked by the user
    pub name: String,
}

impl FileMeta {
    pub fn new(size: u64, mime_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            size,
            mime_type: mime_type.into(),
            name: name.into(),
        }
    }

    /// Lower-cased extension including the leading dot, if the name has one.
    pub fn extension(&self) -> Option<String> {
        let lowered = self.name.to_lowercase();
        lowered.rfind('.').map(|idx| lowered[idx..].to_string())
    }
}

/// Validate message text, returning the trimmed text on success.
///
/// Length is counted in characters, not bytes.
pub fn validate_text(text: &str, max_length: usize) -> Result<String, ValidationError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        debug!("Empty message rejected");
        return Err(ValidationError::EmptyInput);
    }

    let length = trimmed.chars().count();
    if length > max_length {
        debug!(length, max_length, "Message too long");
        return Err(ValidationError::TooLong { max: max_length });
    }

    Ok(trimmed.to_string())
}

/// Validate a dynamically typed message value, as received from a widget
/// configuration or a JSON payload.
pub fn validate_text_value(
    value: &serde_json::Value,
    max_length: usize,
) -> Result<String, ValidationError> {
    match value {
        serde_json::Value::String(text) => validate_text(text, max_length),
        other => {
            debug!(kind = json_kind(other), "Non-string message rejected");
            Err(ValidationError::InvalidType)
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Validate an attachment against a size limit and MIME allowlist.
pub fn validate_file(
    file: &FileMeta,
    max_file_size: u64,
    allowed_types: &[String],
) -> Result<(), FileError> {
    if file.size > max_file_size {
        debug!(size = file.size, max_file_size, "File too large");
        return Err(FileError::TooLarge {
            max_mb: max_file_size / (1024 * 1024),
        });
    }

    if !allowed_types.iter().any(|t| *t == file.mime_type) {
        debug!(mime_type = %file.mime_type, "File type not allowed");
        return Err(FileError::TypeNotAllowed {
            mime_type: file.mime_type.clone(),
        });
    }

    let extension_allowed = file
        .extension()
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));
    if !extension_allowed {
        debug!(name = %file.name, "File extension not allowed");
        return Err(FileError::ExtensionNotAllowed {
            name: file.name.clone(),
        });
    }

    Ok(())
}

/// Validator bound to a [`ValidationConfig`].
#[derive(Debug, Clone)]
pub struct MessageValidator {
    config: ValidationConfig,
}

impl MessageValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate message text against the configured length limit.
    pub fn validate_text(&self, text: &str) -> Result<String, ValidationError> {
        validate_text(text, self.config.max_message_length)
    }

    /// Validate a dynamically typed message value.
    pub fn validate_text_value(&self, value: &serde_json::Value) -> Result<String, ValidationError> {
        validate_text_value(value, self.config.max_message_length)
    }

    /// Validate an attachment against the configured limits.
    pub fn validate_file(&self, file: &FileMeta) -> Result<(), FileError> {
        validate_file(
            file,
            self.config.max_file_size,
            &self.config.allowed_file_types,
        )
    }
}
