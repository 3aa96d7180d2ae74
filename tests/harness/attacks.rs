// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Message flood patterns for rate limiter testing.
//!
//! Time is simulated: each pattern advances a manual clock by `interval`
//! between attempts, so a flood spanning minutes runs instantly.

use std::time::Duration;

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct FloodPattern {
    /// Total number of send attempts
    pub total_messages: usize,
    /// Simulated time between attempts
    pub interval: Duration,
    /// Number of sessions the attempts rotate over
    pub sessions: usize,
}

impl Default for FloodPattern {
    fn default() -> Self {
        Self {
            total_messages: 100,
            interval: Duration::from_secs(1),
            sessions: 1,
        }
    }
}

/// Predefined flood patterns.
impl FloodPattern {
    /// One session pasting messages as fast as it can.
    pub fn single_session_burst() -> Self {
        Self {
            total_messages: 50,
            interval: Duration::from_millis(100),
            sessions: 1,
        }
    }

    /// One message every 7 seconds stays under the minute limit and
    /// reaches, but does not exceed, the hourly one.
    pub fn steady_typist() -> Self {
        Self {
            total_messages: 60,
            interval: Duration::from_secs(7),
            sessions: 1,
        }
    }

    /// Same pace as the typist, kept up past the hourly limit.
    pub fn hourly_grinder() -> Self {
        Self {
            total_messages: 80,
            interval: Duration::from_secs(7),
            sessions: 1,
        }
    }

    /// Many sessions sharing the load, each under its own limit.
    pub fn many_sessions() -> Self {
        Self {
            total_messages: 200,
            interval: Duration::from_millis(100),
            sessions: 20,
        }
    }

    /// Simulated time the whole flood spans.
    pub fn expected_duration(&self) -> Duration {
        self.interval * self.total_messages as u32
    }
}

/// Expected outcome counts under the default configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloodExpectations {
    pub sent: usize,
    pub minute_limited: usize,
    pub hour_limited: usize,
    pub blocked: usize,
}

impl FloodPattern {
    /// Outcomes with 10 messages/minute, 60/hour and a 300s lockout.
    pub fn expectations(&self) -> FloodExpectations {
        let per_session = self.total_messages / self.sessions;
        let spacing = self.interval * self.sessions as u32;

        if spacing >= Duration::from_secs(7) {
            // Never more than 9 sends in a minute; the hour limit decides.
            let sent = per_session.min(60);
            let over = per_session - sent;
            // Attempts that land strictly inside the 300s lockout
            let lockout_attempts = (300 + spacing.as_secs() - 1) / spacing.as_secs() - 1;
            let blocked = over.saturating_sub(1).min(lockout_attempts as usize);
            FloodExpectations {
                sent: sent * self.sessions,
                minute_limited: 0,
                hour_limited: over.min(1) * self.sessions,
                blocked: blocked * self.sessions,
            }
        } else {
            // Whole flood inside one minute per session
            let sent = per_session.min(10);
            FloodExpectations {
                sent: sent * self.sessions,
                minute_limited: (per_session - sent) * self.sessions,
                hour_limited: 0,
                blocked: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_duration() {
        assert_eq!(
            FloodPattern::steady_typist().expected_duration(),
            Duration::from_secs(420)
        );
    }
}
