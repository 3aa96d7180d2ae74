// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for flood simulation.

use chat_content_guard::{GuardError, RateLimitError};
use std::collections::HashMap;

/// Collects outcomes during a flood simulation.
#[derive(Debug, Default)]
pub struct FloodMetrics {
    /// Count of attempts by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Count of attempts by session
    attempts_per_session: HashMap<String, usize>,
}

/// Possible outcomes for a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Sent,
    MinuteLimited,
    HourLimited,
    Blocked,
    Invalid,
}

impl Outcome {
    /// Classify the result of a submission.
    pub fn of<T>(result: &Result<T, GuardError>) -> Self {
        match result {
            Ok(_) => Outcome::Sent,
            Err(GuardError::RateLimit(RateLimitError::MinuteLimitExceeded { .. })) => {
                Outcome::MinuteLimited
            }
            Err(GuardError::RateLimit(RateLimitError::HourLimitExceeded { .. })) => {
                Outcome::HourLimited
            }
            Err(GuardError::RateLimit(RateLimitError::Blocked { .. })) => Outcome::Blocked,
            Err(_) => Outcome::Invalid,
        }
    }
}

impl FloodMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attempt outcome.
    pub fn record(&mut self, outcome: Outcome, session: &str) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self
            .attempts_per_session
            .entry(session.to_string())
            .or_insert(0) += 1;
    }

    /// Total attempt count.
    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Ratio of rejected to total attempts.
    pub fn block_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(Outcome::Sent)) as f64 / total as f64
    }

    /// Number of sessions that made attempts.
    pub fn unique_sessions(&self) -> usize {
        self.attempts_per_session.len()
    }

    /// Generate a summary report.
    pub fn report(&self) -> FloodReport {
        FloodReport {
            total: self.total(),
            sent: self.count(Outcome::Sent),
            minute_limited: self.count(Outcome::MinuteLimited),
            hour_limited: self.count(Outcome::HourLimited),
            blocked: self.count(Outcome::Blocked),
            invalid: self.count(Outcome::Invalid),
            block_rate: self.block_rate(),
            unique_sessions: self.unique_sessions(),
        }
    }
}

/// Summary report of a flood simulation.
#[derive(Debug, Clone)]
pub struct FloodReport {
    pub total: usize,
    pub sent: usize,
    pub minute_limited: usize,
    pub hour_limited: usize,
    pub blocked: usize,
    pub invalid: usize,
    pub block_rate: f64,
    pub unique_sessions: usize,
}

impl std::fmt::Display for FloodReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Flood Report ===")?;
        writeln!(f, "Attempts:          {}", self.total)?;
        writeln!(f, "Sessions:          {}", self.unique_sessions)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(f, "Sent:              {}", self.sent)?;
        writeln!(f, "Minute Limited:    {}", self.minute_limited)?;
        writeln!(f, "Hour Limited:      {}", self.hour_limited)?;
        writeln!(f, "Blocked:           {}", self.blocked)?;
        writeln!(f, "Invalid:           {}", self.invalid)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_outcome_classification() {
        let limited: Result<(), GuardError> = Err(RateLimitError::Blocked {
            retry_after: Duration::from_secs(5),
        }
        .into());
        assert_eq!(Outcome::of(&limited), Outcome::Blocked);
        assert_eq!(Outcome::of(&Ok::<(), GuardError>(())), Outcome::Sent);
    }

    #[test]
    fn test_block_rate() {
        let mut metrics = FloodMetrics::new();
        for _ in 0..3 {
            metrics.record(Outcome::Sent, "s1");
        }
        for _ in 0..7 {
            metrics.record(Outcome::MinuteLimited, "s1");
        }

        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
        assert_eq!(metrics.unique_sessions(), 1);
    }
}
