//! Timing
//!
//! Step cadence and the pauses around global restarts.

use std::time::Duration;

use crate::element::Mode;

/// Pause before typing resumes after everything was deleted
pub const DEFAULT_TYPING_PAUSE_MS: u64 = 500;

/// Pause before deleting starts after everything was typed
pub const DEFAULT_DELETING_PAUSE_MS: u64 = 2000;

/// Period of the first element when none is configured
pub const DEFAULT_FIRST_PERIOD_MS: u64 = 5000;

/// Period of every other element when none is configured
pub const DEFAULT_PERIOD_MS: u64 = 3000;

/// Pauses inserted between a restart and the tick that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Delay before the tick of a restart into [`Mode::Typing`]
    pub typing_pause: Duration,
    /// Delay before the tick of a restart into [`Mode::Deleting`]
    pub deleting_pause: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            typing_pause: Duration::from_millis(DEFAULT_TYPING_PAUSE_MS),
            deleting_pause: Duration::from_millis(DEFAULT_DELETING_PAUSE_MS),
        }
    }
}

impl Timing {
    /// Pause applied after a restart switched the global phase to `mode`
    pub fn restart_pause(&self, mode: Mode) -> Duration {
        match mode {
            Mode::Deleting => self.deleting_pause,
            _ => self.typing_pause,
        }
    }
}

/// Delay between two steps of an element
///
/// `period / len` while typing, half that while deleting.
pub fn step_delay(period: Duration, candidate_len: usize, mode: Mode) -> Duration {
    let len = u32::try_from(candidate_len.max(1)).unwrap_or(u32::MAX);
    let delay = period / len;
    if mode == Mode::Deleting {
        delay / 2
    } else {
        delay
    }
}

/// Period assignment for elements that do not configure their own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodPolicy {
    /// Period of the element at index 0
    pub first: Duration,
    /// Period of every later element
    pub rest: Duration,
}

impl Default for PeriodPolicy {
    fn default() -> Self {
        Self {
            first: Duration::from_millis(DEFAULT_FIRST_PERIOD_MS),
            rest: Duration::from_millis(DEFAULT_PERIOD_MS),
        }
    }
}

impl PeriodPolicy {
    /// Default period for the element at `index`
    pub fn period_for(&self, index: usize) -> Duration {
        if index == 0 {
            self.first
        } else {
            self.rest
        }
    }
}
