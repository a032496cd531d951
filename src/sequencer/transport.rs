// Transport - Playback control and state management
// Owns tempo, step cursor, play/pause/stop state and the selected pattern

use crate::error::SequencerResult;
use crate::pattern::Pattern;
use crate::sequencer::tempo::Tempo;
use std::sync::atomic::{AtomicU8, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Transport state (stopped/playing/paused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl TransportState {
    pub fn is_playing(&self) -> bool {
        matches!(self, TransportState::Playing)
    }

    /// Check if transport is stopped or paused
    pub fn is_stopped(&self) -> bool {
        matches!(self, TransportState::Stopped | TransportState::Paused)
    }

    fn to_u8(self) -> u8 {
        match self {
            TransportState::Stopped => 0,
            TransportState::Playing => 1,
            TransportState::Paused => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => TransportState::Playing,
            2 => TransportState::Paused,
            _ => TransportState::Stopped,
        }
    }
}

/// Shared transport state
/// Thread-safe via atomics for communication with the scheduler thread
///
/// The selected pattern sits behind a mutex together with the cursor
/// updates that depend on its length, so a pattern swap and a step
/// advance can never interleave into an out-of-range cursor.
#[derive(Debug)]
pub struct SharedTransportState {
    state: AtomicU8,
    cursor: AtomicUsize,
    tempo_bits: AtomicU64,
    /// Bumped on every play/pause/stop transition; the scheduler re-anchors
    /// its due time whenever it sees a new value
    generation: AtomicU64,
    pattern: Mutex<Arc<Pattern>>,
}

impl SharedTransportState {
    pub fn new(pattern: Arc<Pattern>, tempo: Tempo) -> Arc<Self> {
        Arc::new(Self {
            state: AtomicU8::new(TransportState::Stopped.to_u8()),
            cursor: AtomicUsize::new(0),
            tempo_bits: AtomicU64::new(tempo.steps_per_minute().to_bits()),
            generation: AtomicU64::new(0),
            pattern: Mutex::new(pattern),
        })
    }

    pub fn state(&self) -> TransportState {
        TransportState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Change state under the pattern lock so no step is taken mid-transition
    fn set_state(&self, state: TransportState) {
        let _pattern = self.lock_pattern();
        self.state.store(state.to_u8(), Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
        if state == TransportState::Stopped {
            self.cursor.store(0, Ordering::Release);
        }
    }

    /// Index of the next step to be scheduled
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub fn tempo(&self) -> Tempo {
        let steps_per_minute = f64::from_bits(self.tempo_bits.load(Ordering::Relaxed));
        // Only validated tempos are ever stored
        Tempo::new(steps_per_minute).unwrap_or_default()
    }

    fn set_tempo(&self, tempo: Tempo) {
        self.tempo_bits
            .store(tempo.steps_per_minute().to_bits(), Ordering::Relaxed);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn lock_pattern(&self) -> MutexGuard<'_, Arc<Pattern>> {
        // The guarded value is a single Arc swap, it cannot be left half-written
        self.pattern.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn pattern(&self) -> Arc<Pattern> {
        Arc::clone(&self.lock_pattern())
    }

    /// Swap the active pattern, wrapping the cursor into the new length
    fn replace_pattern(&self, pattern: Arc<Pattern>) -> usize {
        let mut current = self.lock_pattern();
        let cursor = pattern.wrap(self.cursor.load(Ordering::Acquire));
        self.cursor.store(cursor, Ordering::Release);
        *current = pattern;
        cursor
    }

    /// Take the step at the cursor and advance the cursor by one (wrapping)
    ///
    /// Returns the pattern and the step index to fire, or `None` when the
    /// transport is not playing.
    pub fn take_step(&self) -> Option<(Arc<Pattern>, usize)> {
        let pattern = self.lock_pattern();
        if !self.state().is_playing() {
            return None;
        }
        let index = pattern.wrap(self.cursor.load(Ordering::Acquire));
        self.cursor
            .store(pattern.wrap(index + 1), Ordering::Release);
        Some((Arc::clone(&pattern), index))
    }
}

/// Transport controller
/// Manages playback state, tempo and pattern selection
pub struct Transport {
    shared_state: Arc<SharedTransportState>,
}

impl Transport {
    /// Create a stopped transport on `pattern`
    pub fn new(pattern: Arc<Pattern>, tempo: Tempo) -> Self {
        Self {
            shared_state: SharedTransportState::new(pattern, tempo),
        }
    }

    /// Get shared state (for passing to the scheduler)
    pub fn shared_state(&self) -> Arc<SharedTransportState> {
        Arc::clone(&self.shared_state)
    }

    pub fn state(&self) -> TransportState {
        self.shared_state.state()
    }

    pub fn cursor(&self) -> usize {
        self.shared_state.cursor()
    }

    pub fn pattern(&self) -> Arc<Pattern> {
        self.shared_state.pattern()
    }

    pub fn tempo(&self) -> Tempo {
        self.shared_state.tempo()
    }

    /// Change tempo. Applies from the next step whose due time is not yet computed.
    pub fn set_tempo(&mut self, steps_per_minute: f64) -> SequencerResult<()> {
        let tempo = Tempo::new(steps_per_minute)?;
        self.shared_state.set_tempo(tempo);
        log::info!("Tempo set to {}", tempo);
        Ok(())
    }

    /// Swap the active pattern; the cursor becomes `cursor mod new_length`
    pub fn select_pattern(&mut self, pattern: Arc<Pattern>) {
        let name = pattern.name().to_string();
        let cursor = self.shared_state.replace_pattern(pattern);
        log::info!("Selected pattern '{}' (cursor {})", name, cursor);
    }

    /// Play (no-op when already playing)
    pub fn play(&mut self) {
        if self.state().is_playing() {
            return;
        }
        self.shared_state.set_state(TransportState::Playing);
        log::info!("Transport playing from step {}", self.cursor());
    }

    /// Pause (keep current cursor)
    pub fn pause(&mut self) {
        if self.state() != TransportState::Playing {
            return;
        }
        self.shared_state.set_state(TransportState::Paused);
        log::info!("Transport paused at step {}", self.cursor());
    }

    /// Stop (reset cursor to 0)
    pub fn stop(&mut self) {
        self.shared_state.set_state(TransportState::Stopped);
        log::info!("Transport stopped");
    }

    /// Toggle play/pause
    pub fn toggle_play(&mut self) {
        if self.state().is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }
}
