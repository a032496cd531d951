// Instrument registry - maps each instrument to its volume and trigger capability

use crate::error::{SequencerError, SequencerResult};
use crate::instrument::emitter::{SoundEmitter, TriggerEvent};
use crate::instrument::{INSTRUMENT_COUNT, InstrumentId};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// A named sound source with a live volume
///
/// Volume is stored as f32 bits in an atomic so the UI thread can change it
/// while the scheduler reads it, without torn reads.
#[derive(Debug)]
pub struct Instrument {
    id: InstrumentId,
    volume_bits: AtomicU32,
}

impl Instrument {
    pub fn new(id: InstrumentId, volume: f32) -> Self {
        Self {
            id,
            volume_bits: AtomicU32::new(clamp_volume(volume).to_bits()),
        }
    }

    pub fn id(&self) -> InstrumentId {
        self.id
    }

    /// Current volume (0.0 to 1.0)
    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }

    /// Set volume, clamped to [0.0, 1.0]. Returns the stored value.
    pub fn set_volume(&self, volume: f32) -> f32 {
        let clamped = clamp_volume(volume);
        self.volume_bits.store(clamped.to_bits(), Ordering::Relaxed);
        clamped
    }
}

/// Clamp a requested volume into [0.0, 1.0]. NaN maps to silence.
fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Registry of the eight canonical instruments
///
/// Shared between the control thread (volume changes) and the scheduler
/// thread (triggers). The emitter is the external audio-output subsystem.
pub struct InstrumentRegistry {
    instruments: [Instrument; INSTRUMENT_COUNT],
    emitter: Arc<dyn SoundEmitter>,
}

impl InstrumentRegistry {
    /// Create a registry with every instrument at its default volume
    pub fn new(emitter: Arc<dyn SoundEmitter>) -> Self {
        Self {
            instruments: InstrumentId::ALL.map(|id| Instrument::new(id, id.default_volume())),
            emitter,
        }
    }

    /// Create a registry with explicit initial volumes (e.g. from a catalogue)
    pub fn with_volumes(
        emitter: Arc<dyn SoundEmitter>,
        volumes: [f32; INSTRUMENT_COUNT],
    ) -> Self {
        Self {
            instruments: InstrumentId::ALL.map(|id| Instrument::new(id, volumes[id.index()])),
            emitter,
        }
    }

    pub fn instrument(&self, id: InstrumentId) -> &Instrument {
        &self.instruments[id.index()]
    }

    /// Instruments in registry order
    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    /// Resolve an instrument by catalogue name
    pub fn resolve(&self, name: &str) -> SequencerResult<InstrumentId> {
        name.parse()
    }

    pub fn volume(&self, id: InstrumentId) -> f32 {
        self.instrument(id).volume()
    }

    /// Snapshot of every instrument volume, indexed by `InstrumentId::index`
    pub fn volumes(&self) -> [f32; INSTRUMENT_COUNT] {
        InstrumentId::ALL.map(|id| self.volume(id))
    }

    /// Set an instrument's volume. Out-of-range values are clamped, never rejected.
    ///
    /// Takes effect for every future trigger of the instrument, pattern-wide.
    pub fn set_volume(&self, id: InstrumentId, volume: f32) -> f32 {
        let stored = self.instrument(id).set_volume(volume);
        log::debug!("Volume of {} set to {:.3}", id, stored);
        stored
    }

    /// Set volume by instrument name
    pub fn set_volume_by_name(&self, name: &str, volume: f32) -> SequencerResult<f32> {
        let id = self.resolve(name)?;
        Ok(self.set_volume(id, volume))
    }

    /// Schedule one sound of `id` at absolute output time `at`
    ///
    /// The gain is the instrument's volume at the moment of this call.
    pub fn trigger(&self, id: InstrumentId, at: f64) -> SequencerResult<()> {
        let event = TriggerEvent {
            instrument: id,
            at,
            gain: self.volume(id),
        };

        self.emitter
            .emit(event)
            .map_err(|e| SequencerError::TriggerFailure {
                instrument: id,
                reason: e.to_string(),
            })
    }

    /// Trigger by instrument name
    pub fn trigger_by_name(&self, name: &str, at: f64) -> SequencerResult<()> {
        let id = self.resolve(name)?;
        self.trigger(id, at)
    }
}
