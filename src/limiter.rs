// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window message rate limiter with lockout.
//!
//! Each chat session owns a [`RateLimitState`] holding the send times of its
//! recent messages. Two windows are enforced:
//! 1. Per-minute limit (10 messages default), self-expiring
//! 2. Per-hour limit (60 messages default), which locks the session out for
//!    five minutes when reached
//!
//! When a lockout expires the session starts over with an empty history.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use crate::error::RateLimitError;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(60 * 60);

/// Snapshot of a session's usage, for UI counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Messages sent in the trailing minute
    pub sent_last_minute: u32,
    /// Messages sent in the trailing hour
    pub sent_last_hour: u32,
    /// Messages left before the minute limit
    pub remaining_minute: u32,
    /// Messages left before the hour limit
    pub remaining_hour: u32,
    /// Time left on an active lockout
    pub locked_for: Option<Duration>,
}

/// Rate limit state of one chat session.
#[derive(Debug, Clone, Default)]
pub struct RateLimitState {
    /// Send times, oldest first
    timestamps: VecDeque<Instant>,
    /// Whether the session is locked out
    blocked: bool,
    /// When the lockout ends
    blocked_until: Option<Instant>,
    /// Last check or record, for idle eviction
    last_activity: Option<Instant>,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a message may be sent at `now`.
    ///
    /// Runs before every send attempt. Never records the attempt.
    pub fn check(&mut self, now: Instant, config: &RateLimitConfig) -> Result<(), RateLimitError> {
        self.last_activity = Some(now);
        self.prune(now);

        if !config.enabled {
            return Ok(());
        }

        if self.blocked {
            match self.blocked_until {
                Some(until) if now < until => {
                    let retry_after = until.duration_since(now);
                    debug!(?retry_after, "Session locked out");
                    return Err(RateLimitError::Blocked { retry_after });
                }
                _ => {
                    info!("Lockout expired, resetting session history");
                    self.blocked = false;
                    self.blocked_until = None;
                    self.timestamps.clear();
                }
            }
        }

        let sent_last_hour = self.timestamps.len();
        if sent_last_hour >= config.max_messages_per_hour as usize {
            let lockout = config.lockout_duration();
            warn!(
                sent_last_hour,
                lockout_secs = lockout.as_secs(),
                "Hourly message limit reached, locking session"
            );
            self.blocked = true;
            self.blocked_until = Some(now + lockout);
            return Err(RateLimitError::HourLimitExceeded {
                retry_after: lockout,
            });
        }

        let in_minute = self.count_within(now, MINUTE);
        let max_per_minute = config.max_messages_per_minute as usize;
        if in_minute >= max_per_minute {
            let retry_after = self.minute_retry_after(now, in_minute, max_per_minute);
            debug!(in_minute, ?retry_after, "Minute message limit reached");
            return Err(RateLimitError::MinuteLimitExceeded { retry_after });
        }

        Ok(())
    }

    /// Record a message that was accepted and sent at `now`.
    pub fn record(&mut self, now: Instant) {
        self.last_activity = Some(now);
        // Keep the history ascending even if a caller passes a stale instant.
        let at = self.timestamps.back().map_or(now, |last| now.max(*last));
        self.timestamps.push_back(at);
        self.prune(now);
    }

    /// Usage snapshot at `now`. Does not change state.
    pub fn status(&self, now: Instant, config: &RateLimitConfig) -> RateLimitStatus {
        let locked_for = match (self.blocked, self.blocked_until) {
            (true, Some(until)) if now < until => Some(until.duration_since(now)),
            _ => None,
        };
        let sent_last_minute = self.count_within(now, MINUTE) as u32;
        let sent_last_hour = self.count_within(now, HOUR) as u32;

        RateLimitStatus {
            sent_last_minute,
            sent_last_hour,
            remaining_minute: config.max_messages_per_minute.saturating_sub(sent_last_minute),
            remaining_hour: config.max_messages_per_hour.saturating_sub(sent_last_hour),
            locked_for,
        }
    }

    /// Whether the session is currently marked as locked out.
    pub fn is_locked(&self) -> bool {
        self.blocked
    }

    /// End of the current lockout, if any.
    pub fn blocked_until(&self) -> Option<Instant> {
        self.blocked_until
    }

    /// Recorded send times, oldest first.
    pub fn timestamps(&self) -> impl Iterator<Item = &Instant> {
        self.timestamps.iter()
    }

    /// Number of recorded send times still in the hourly window.
    pub fn recorded(&self) -> usize {
        self.timestamps.len()
    }

    /// Drop send times at least an hour old.
    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.timestamps.front() {
            if now.saturating_duration_since(*oldest) >= HOUR {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    fn count_within(&self, now: Instant, window: Duration) -> usize {
        self.timestamps
            .iter()
            .rev()
            .take_while(|t| now.saturating_duration_since(**t) < window)
            .count()
    }

    /// Time until enough minute-window entries expire to allow one more send.
    fn minute_retry_after(&self, now: Instant, in_minute: usize, max_per_minute: usize) -> Duration {
        let first_in_window = self.timestamps.len() - in_minute;
        let must_expire = first_in_window + (in_minute - max_per_minute);
        self.timestamps
            .get(must_expire)
            .map(|t| (*t + MINUTE).saturating_duration_since(now))
            .unwrap_or(MINUTE)
    }

    /// A session may be forgotten only once forgetting it cannot widen its
    /// budget: no live lockout and no send still inside the hourly window.
    fn is_idle(&self, now: Instant, idle: Duration) -> bool {
        let lock_active = self.blocked && self.blocked_until.is_some_and(|until| now < until);
        let quiet = self
            .last_activity
            .map_or(true, |at| now.saturating_duration_since(at) >= idle);
        quiet && !lock_active && self.count_within(now, HOUR) == 0
    }
}

/// Rate limiter owned by a single session actor.
pub struct SessionRateLimiter {
    config: RateLimitConfig,
    state: RateLimitState,
    clock: Arc<dyn Clock>,
}

impl SessionRateLimiter {
    /// Create a limiter using the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock(config: RateLimitConfig, clock: impl Clock + 'static) -> Self {
        Self {
            config,
            state: RateLimitState::new(),
            clock: Arc::new(clock),
        }
    }

    /// Check before a send attempt.
    pub fn check(&mut self) -> Result<(), RateLimitError> {
        self.state.check(self.clock.now(), &self.config)
    }

    /// Record a message after it was actually sent.
    pub fn record(&mut self) {
        self.state.record(self.clock.now());
    }

    pub fn status(&self) -> RateLimitStatus {
        self.state.status(self.clock.now(), &self.config)
    }

    pub fn state(&self) -> &RateLimitState {
        &self.state
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

/// Thread-safe rate limiter for many concurrent sessions.
///
/// Each session state has its own lock; the session map is only locked
/// while looking a session up, so unrelated sessions never wait on each
/// other.
pub struct RateLimiter {
    /// Configuration
    config: RateLimitConfig,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Per-session state
    sessions: Arc<RwLock<HashMap<String, Arc<Mutex<RateLimitState>>>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock(config: RateLimitConfig, clock: impl Clock + 'static) -> Self {
        Self {
            config,
            clock: Arc::new(clock),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    async fn session(&self, session_id: &str) -> Arc<Mutex<RateLimitState>> {
        if let Some(state) = self.sessions.read().await.get(session_id) {
            return Arc::clone(state);
        }

        let mut sessions = self.sessions.write().await;
        Arc::clone(
            sessions
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(RateLimitState::new()))),
        )
    }

    /// Check whether `session_id` may send a message now.
    pub async fn check(&self, session_id: &str) -> Result<(), RateLimitError> {
        let state = self.session(session_id).await;
        let mut state = state.lock().await;
        let result = state.check(self.clock.now(), &self.config);
        if let Err(ref err) = result {
            debug!(session = %session_id, code = err.code(), "Message rate limited");
        }
        result
    }

    /// Record a message sent by `session_id`.
    pub async fn record(&self, session_id: &str) {
        let state = self.session(session_id).await;
        state.lock().await.record(self.clock.now());
    }

    /// Usage snapshot for `session_id`.
    pub async fn status(&self, session_id: &str) -> RateLimitStatus {
        let state = self.session(session_id).await;
        let state = state.lock().await;
        state.status(self.clock.now(), &self.config)
    }

    /// Drop a session's state. Returns whether it existed.
    pub async fn end_session(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Number of tracked sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Evict idle sessions that hold no active lockout and no send inside
    /// the hourly window (should be called periodically). Returns how many
    /// were evicted.
    pub async fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let idle = self.config.session_idle_duration();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        // A session busy with a check is active; keep it.
        sessions.retain(|_, state| match state.try_lock() {
            Ok(state) => !state.is_idle(now, idle),
            Err(_) => true,
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }
}
