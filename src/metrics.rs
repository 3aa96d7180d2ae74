// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for the content pipeline.

use crate::config::MetricsConfig;
use crate::error::ConfigError;
use crate::sanitizer::SanitizeReport;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Counters describing what the pipeline accepted, rejected and stripped.
#[derive(Clone)]
pub struct PipelineMetrics {
    enabled: bool,
    registry: Registry,
    messages_accepted: IntCounter,
    messages_rejected: IntCounterVec,
    markup_rendered: IntCounter,
    elements_stripped: IntCounter,
    attributes_dropped: IntCounter,
}

impl PipelineMetrics {
    /// Create and register all counters.
    pub fn new(config: &MetricsConfig) -> Result<Self, ConfigError> {
        let registry = Registry::new_custom(Some(config.namespace.clone()), None)
            .map_err(metrics_error)?;

        let messages_accepted = IntCounter::new(
            "messages_accepted_total",
            "Outbound messages that passed validation and rate limiting",
        )
        .map_err(metrics_error)?;
        let messages_rejected = IntCounterVec::new(
            Opts::new(
                "messages_rejected_total",
                "Outbound messages or attachments rejected, by reason",
            ),
            &["reason"],
        )
        .map_err(metrics_error)?;
        let markup_rendered = IntCounter::new(
            "markup_rendered_total",
            "Inbound payloads passed through the sanitizer",
        )
        .map_err(metrics_error)?;
        let elements_stripped = IntCounter::new(
            "sanitizer_elements_stripped_total",
            "Disallowed elements reduced to text",
        )
        .map_err(metrics_error)?;
        let attributes_dropped = IntCounter::new(
            "sanitizer_attributes_dropped_total",
            "Attributes removed from allowed elements",
        )
        .map_err(metrics_error)?;

        registry
            .register(Box::new(messages_accepted.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(messages_rejected.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(markup_rendered.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(elements_stripped.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(attributes_dropped.clone()))
            .map_err(metrics_error)?;

        Ok(Self {
            enabled: config.enabled,
            registry,
            messages_accepted,
            messages_rejected,
            markup_rendered,
            elements_stripped,
            attributes_dropped,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn message_accepted(&self) {
        if self.enabled {
            self.messages_accepted.inc();
        }
    }

    /// Count a rejection under its machine-readable code.
    pub fn message_rejected(&self, code: &str) {
        if self.enabled {
            self.messages_rejected.with_label_values(&[code]).inc();
        }
    }

    pub fn markup_rendered(&self, report: &SanitizeReport) {
        if self.enabled {
            self.markup_rendered.inc();
            self.elements_stripped.inc_by(report.elements_stripped as u64);
            self.attributes_dropped.inc_by(report.attributes_dropped as u64);
        }
    }

    /// Accepted message count so far.
    pub fn accepted(&self) -> u64 {
        self.messages_accepted.get()
    }

    /// Rejection count for one reason code.
    pub fn rejected(&self, code: &str) -> u64 {
        self.messages_rejected.with_label_values(&[code]).get()
    }

    /// Render all counters in the Prometheus text format.
    pub fn encode(&self) -> String {
        TextEncoder::new()
            .encode_to_string(&self.registry.gather())
            .unwrap_or_default()
    }
}

fn metrics_error(err: prometheus::Error) -> ConfigError {
    ConfigError::InvalidValue {
        field: "metrics",
        reason: err.to_string(),
    }
}
