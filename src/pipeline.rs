// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The two message flows of a chat session.
//!
//! Outbound (user to backend): validate, then check the session's rate
//! limit; once the host has actually sent the message it calls
//! [`MessagePipeline::confirm_sent`] so the send counts against the window.
//!
//! Inbound (backend to screen): linkify, then sanitize. Sanitizing always
//! runs last.

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{GuardError, Result};
use crate::limiter::{RateLimitStatus, RateLimiter};
use crate::linkify::{linkify, linkify_text};
use crate::metrics::PipelineMetrics;
use crate::sanitizer::Sanitizer;
use crate::validator::{FileMeta, MessageValidator};
use tracing::{debug, info};

/// Shared pipeline state for all sessions of a host.
pub struct MessagePipeline {
    pub validator: MessageValidator,
    pub limiter: RateLimiter,
    pub metrics: PipelineMetrics,
    pub config: Config,
}

impl MessagePipeline {
    /// Build a pipeline from validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let limiter = RateLimiter::new(config.rate_limit.clone());
        Self::assemble(config, limiter)
    }

    /// Build a pipeline whose rate limiter reads time from `clock`.
    pub fn with_clock(config: Config, clock: impl Clock + 'static) -> Result<Self> {
        config.validate()?;
        let limiter = RateLimiter::with_clock(config.rate_limit.clone(), clock);
        Self::assemble(config, limiter)
    }

    fn assemble(config: Config, limiter: RateLimiter) -> Result<Self> {
        let metrics = PipelineMetrics::new(&config.metrics)?;
        Ok(Self {
            validator: MessageValidator::new(config.validation.clone()),
            limiter,
            metrics,
            config,
        })
    }

    /// Validate and rate-check a text message.
    ///
    /// Returns the trimmed text to send. Nothing is recorded until
    /// [`confirm_sent`](Self::confirm_sent) is called.
    pub async fn submit_text(&self, session_id: &str, text: &str) -> Result<String> {
        let outcome = self.gate_text(session_id, text).await;
        self.observe(session_id, &outcome);
        outcome
    }

    async fn gate_text(&self, session_id: &str, text: &str) -> Result<String> {
        let trimmed = self.validator.validate_text(text)?;
        self.limiter.check(session_id).await?;
        Ok(trimmed)
    }

    /// Validate and rate-check an attachment upload.
    pub async fn submit_file(&self, session_id: &str, file: &FileMeta) -> Result<()> {
        let outcome = self.gate_file(session_id, file).await;
        self.observe(session_id, &outcome);
        outcome
    }

    async fn gate_file(&self, session_id: &str, file: &FileMeta) -> Result<()> {
        self.validator.validate_file(file)?;
        self.limiter.check(session_id).await?;
        Ok(())
    }

    /// Count a message that was actually dispatched.
    pub async fn confirm_sent(&self, session_id: &str) {
        self.limiter.record(session_id).await;
    }

    /// Current usage of a session's rate limit.
    pub async fn status(&self, session_id: &str) -> RateLimitStatus {
        self.limiter.status(session_id).await
    }

    /// Forget a session when its chat closes.
    pub async fn end_session(&self, session_id: &str) -> bool {
        self.limiter.end_session(session_id).await
    }

    /// Make bot-returned markup safe to insert into the page.
    pub fn render_bot_markup(&self, html: &str) -> String {
        self.render(&linkify(html))
    }

    /// Render a user's own text literally, with clickable links.
    pub fn render_user_text(&self, text: &str) -> String {
        self.render(&linkify_text(text))
    }

    fn render(&self, markup: &str) -> String {
        let (safe, report) = Sanitizer::default().sanitize_with_report(markup);
        self.metrics.markup_rendered(&report);
        safe
    }

    fn observe<T>(&self, session_id: &str, outcome: &Result<T>) {
        match outcome {
            Ok(_) => {
                debug!(session = %session_id, "Message accepted");
                self.metrics.message_accepted();
            }
            Err(err) => {
                if let GuardError::RateLimit(limit) = err {
                    info!(
                        session = %session_id,
                        reason = %limit,
                        retry_after_secs = limit.retry_after_secs(),
                        "Message rate limited"
                    );
                } else {
                    debug!(session = %session_id, error = %err, "Message rejected");
                }
                self.metrics.message_rejected(err.code());
            }
        }
    }
}
