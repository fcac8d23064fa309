//! Play time tracking
//!
//! Accumulates frame deltas into the trainer's total play time. The whole
//! seconds double as the game clock used for scheduled event trigger times.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Total time spent in game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PlayTime {
    /// Elapsed milliseconds
    millis: u64,
}

impl PlayTime {
    pub fn from_secs(secs: u64) -> Self {
        Self { millis: secs.saturating_mul(1000) }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Advance by a frame delta
    pub fn update(&mut self, delta: Duration) {
        let delta_ms = u64::try_from(delta.as_millis()).unwrap_or(u64::MAX);
        self.millis = self.millis.saturating_add(delta_ms);
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Whole seconds elapsed
    pub fn as_secs(&self) -> u64 {
        self.millis / 1000
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }

    pub fn hours(&self) -> u64 {
        self.as_secs() / 3600
    }

    pub fn minutes(&self) -> u64 {
        (self.as_secs() / 60) % 60
    }
}

impl fmt::Display for PlayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours(), self.minutes())
    }
}
