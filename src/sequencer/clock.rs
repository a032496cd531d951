// Output clocks - the timeline trigger due times are expressed on

use crate::error::{SequencerError, SequencerResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Source of the current output time in seconds
///
/// Due times handed to the sound emitter are absolute values on this clock.
pub trait OutputClock: Send + Sync {
    fn now(&self) -> f64;
}

/// Monotonic wall clock, zero at construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputClock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock driven by the audio callback's frame counter
///
/// The audio thread calls `advance` once per buffer; the scheduler reads
/// `now`. Following the device clock instead of the wall clock keeps due
/// times aligned with what is actually rendered.
#[derive(Debug, Clone)]
pub struct SampleClock {
    frames: Arc<AtomicU64>,
    sample_rate: f64,
}

impl SampleClock {
    /// Fails unless `sample_rate` is finite and > 0
    pub fn new(sample_rate: f64) -> SequencerResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SequencerError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate,
        })
    }

    /// Frames rendered so far (called from any thread)
    pub fn current_frame(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Advance by one rendered buffer (called from the audio callback)
    pub fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::Relaxed);
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Absolute frame at which a due time falls
    pub fn seconds_to_frame(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate).round() as u64
    }

    /// Offset of a due time from the current frame, 0 if already due
    ///
    /// Capped at u32::MAX, the range of a per-buffer offset.
    pub fn frames_from_now(&self, seconds: f64) -> u32 {
        self.seconds_to_frame(seconds)
            .saturating_sub(self.current_frame())
            .min(u32::MAX as u64) as u32
    }
}

impl OutputClock for SampleClock {
    fn now(&self) -> f64 {
        self.current_frame() as f64 / self.sample_rate
    }
}

/// Manually advanced clock for deterministic tests and offline rendering
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: f64) {
        self.micros
            .store((seconds.max(0.0) * 1_000_000.0).round() as u64, Ordering::Relaxed);
    }

    pub fn advance(&self, seconds: f64) {
        self.set(self.now() + seconds);
    }
}

impl OutputClock for ManualClock {
    fn now(&self) -> f64 {
        self.micros.load(Ordering::Relaxed) as f64 / 1_000_000.0
    }
}
