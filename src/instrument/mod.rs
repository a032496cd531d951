// Instruments - the fixed percussion kit shared by every pattern

pub mod emitter;
pub mod registry;

pub use emitter::{ChannelEmitter, EmitError, NullEmitter, SoundEmitter, TriggerEvent};
pub use registry::{Instrument, InstrumentRegistry};

use crate::error::SequencerError;
use std::fmt;
use std::str::FromStr;

/// Number of canonical instruments in the kit
pub const INSTRUMENT_COUNT: usize = 8;

/// One of the eight canonical drum-machine instruments
///
/// Identity is shared across all patterns; only per-step activation differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstrumentId {
    Kick,
    Clap,
    Snare,
    Hat,
    Shaker,
    Bongo1,
    Congaz,
    Harmony,
}

impl InstrumentId {
    /// All instruments in registry order (also the trigger issue order within a step)
    pub const ALL: [InstrumentId; INSTRUMENT_COUNT] = [
        InstrumentId::Kick,
        InstrumentId::Clap,
        InstrumentId::Snare,
        InstrumentId::Hat,
        InstrumentId::Shaker,
        InstrumentId::Bongo1,
        InstrumentId::Congaz,
        InstrumentId::Harmony,
    ];

    /// Catalogue name of the instrument
    pub fn name(&self) -> &'static str {
        match self {
            InstrumentId::Kick => "kick",
            InstrumentId::Clap => "clap",
            InstrumentId::Snare => "snare",
            InstrumentId::Hat => "hat",
            InstrumentId::Shaker => "shaker",
            InstrumentId::Bongo1 => "bongo1",
            InstrumentId::Congaz => "congaz",
            InstrumentId::Harmony => "harmony",
        }
    }

    /// Position in `ALL`, used to index per-step and per-registry arrays
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Gain staging used when no catalogue volume is available
    pub fn default_volume(&self) -> f32 {
        match self {
            InstrumentId::Kick => 0.5,
            InstrumentId::Clap => 0.3,
            InstrumentId::Snare => 0.4,
            InstrumentId::Hat => 0.2,
            InstrumentId::Shaker => 0.25,
            InstrumentId::Bongo1 => 0.35,
            InstrumentId::Congaz => 0.35,
            InstrumentId::Harmony => 0.15,
        }
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InstrumentId {
    type Err = SequencerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstrumentId::ALL
            .iter()
            .copied()
            .find(|id| id.name() == s)
            .ok_or_else(|| SequencerError::InstrumentNotFound(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_names_round_trip() {
        for id in InstrumentId::ALL {
            assert_eq!(id.name().parse::<InstrumentId>().unwrap(), id);
        }
    }

    #[test]
    fn test_index_matches_registry_order() {
        for (i, id) in InstrumentId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_unknown_instrument() {
        let err = "cowbell".parse::<InstrumentId>().unwrap_err();
        assert_eq!(err, SequencerError::InstrumentNotFound("cowbell".into()));
    }

    #[test]
    fn test_default_volumes_in_range() {
        for id in InstrumentId::ALL {
            let v = id.default_volume();
            assert!((0.0..=1.0).contains(&v), "{} default volume {}", id, v);
        }
    }
}
