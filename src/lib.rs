// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Chat Content Guard
//!
//! The content-safety pipeline that sits between a chat widget and its
//! backend:
//!
//! - Allowlist HTML sanitizer for bot-returned markup
//! - Safe autolinking of bare URLs
//! - Message text and attachment validation
//! - Per-session rate limiting (per-minute and per-hour windows) with lockout
//!
//! Outbound messages flow `validator -> limiter.check -> send -> limiter.record`.
//! Inbound markup flows `linkify -> sanitize -> render`. [`MessagePipeline`]
//! wires both flows together.

pub mod allowlist;
pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;
pub mod linkify;
pub mod markup;
pub mod metrics;
pub mod pipeline;
pub mod sanitizer;
pub mod telemetry;
pub mod url_policy;
pub mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{ConfigError, FileError, GuardError, RateLimitError, Result, ValidationError};
pub use limiter::{RateLimitState, RateLimitStatus, RateLimiter, SessionRateLimiter};
pub use linkify::{linkify, linkify_text};
pub use markup::escape_text;
pub use pipeline::MessagePipeline;
pub use sanitizer::sanitize;
pub use url_policy::is_safe_url;
pub use validator::{validate_file, validate_text, validate_text_value, FileMeta, MessageValidator};
