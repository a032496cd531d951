// Tempo - steps per minute and derived step durations

use crate::error::{SequencerError, SequencerResult};
use std::fmt;

/// Playback tempo in steps per minute
///
/// One step lasts `60 / steps_per_minute` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    steps_per_minute: f64,
}

impl Tempo {
    /// Create a tempo. Fails on a non-positive or non-finite value.
    pub fn new(steps_per_minute: f64) -> SequencerResult<Self> {
        if steps_per_minute.is_finite() && steps_per_minute > 0.0 {
            Ok(Self { steps_per_minute })
        } else {
            Err(SequencerError::InvalidTempo(steps_per_minute))
        }
    }

    pub fn steps_per_minute(&self) -> f64 {
        self.steps_per_minute
    }

    /// Duration of one step in seconds
    pub fn step_duration_seconds(&self) -> f64 {
        60.0 / self.steps_per_minute
    }

    /// Duration of one step in samples at the given sample rate
    pub fn step_duration_samples(&self, sample_rate: f64) -> f64 {
        self.step_duration_seconds() * sample_rate
    }

    /// Duration of `steps` steps in seconds
    pub fn pattern_duration_seconds(&self, steps: usize) -> f64 {
        self.step_duration_seconds() * steps as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            steps_per_minute: 120.0,
        }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} steps/min", self.steps_per_minute)
    }
}
