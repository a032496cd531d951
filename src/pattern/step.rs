// Step - one time slot of a pattern grid

use crate::instrument::{INSTRUMENT_COUNT, InstrumentId};
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-instrument activation flags for one step
///
/// Every step defines a flag for every instrument. Each flag is its own
/// atomic, so toggling one instrument never tears a concurrent read of
/// another and the whole pattern never needs a lock.
#[derive(Debug)]
pub struct Step {
    active: [AtomicBool; INSTRUMENT_COUNT],
}

impl Step {
    pub fn new(active: [bool; INSTRUMENT_COUNT]) -> Self {
        Self {
            active: active.map(AtomicBool::new),
        }
    }

    /// A step with every instrument off
    pub fn silent() -> Self {
        Self::new([false; INSTRUMENT_COUNT])
    }

    pub fn is_active(&self, instrument: InstrumentId) -> bool {
        self.active[instrument.index()].load(Ordering::Relaxed)
    }

    pub fn set_active(&self, instrument: InstrumentId, active: bool) {
        self.active[instrument.index()].store(active, Ordering::Relaxed);
    }

    /// Copy of all flags, indexed by `InstrumentId::index`
    pub fn snapshot(&self) -> [bool; INSTRUMENT_COUNT] {
        InstrumentId::ALL.map(|id| self.is_active(id))
    }

    /// Active instruments in registry order
    pub fn active_instruments(&self) -> impl Iterator<Item = InstrumentId> + '_ {
        InstrumentId::ALL
            .into_iter()
            .filter(move |id| self.is_active(*id))
    }

    pub fn is_silent(&self) -> bool {
        self.active_instruments().next().is_none()
    }
}

impl Clone for Step {
    fn clone(&self) -> Self {
        Self::new(self.snapshot())
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::silent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_step() {
        let step = Step::silent();
        assert!(step.is_silent());
        assert_eq!(step.snapshot(), [false; INSTRUMENT_COUNT]);
    }

    #[test]
    fn test_toggle_instrument() {
        let step = Step::silent();
        step.set_active(InstrumentId::Hat, true);

        assert!(step.is_active(InstrumentId::Hat));
        assert!(!step.is_active(InstrumentId::Kick));
        assert!(!step.is_silent());

        step.set_active(InstrumentId::Hat, false);
        assert!(step.is_silent());
    }

    #[test]
    fn test_active_instruments_in_registry_order() {
        let step = Step::silent();
        step.set_active(InstrumentId::Harmony, true);
        step.set_active(InstrumentId::Kick, true);
        step.set_active(InstrumentId::Snare, true);

        let active: Vec<_> = step.active_instruments().collect();
        assert_eq!(
            active,
            vec![InstrumentId::Kick, InstrumentId::Snare, InstrumentId::Harmony]
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let step = Step::silent();
        step.set_active(InstrumentId::Clap, true);

        let copy = step.clone();
        step.set_active(InstrumentId::Clap, false);

        assert!(copy.is_active(InstrumentId::Clap));
        assert!(!step.is_active(InstrumentId::Clap));
    }
}
