// Pattern - a fixed-length, loopable grid of steps

use crate::error::{SequencerError, SequencerResult};
use crate::instrument::InstrumentId;
use crate::pattern::step::Step;

/// Position of a pattern within its catalogue
pub type PatternIndex = u32;

/// A named rhythm pattern
///
/// The step count is fixed at construction and step indices are contiguous
/// from 0. Activation flags stay mutable during playback.
#[derive(Debug, Clone)]
pub struct Pattern {
    name: String,
    index: PatternIndex,
    steps: Box<[Step]>,
}

impl Pattern {
    /// Create a pattern from its steps
    ///
    /// Returns `None` for an empty step list, since a zero-length pattern
    /// cannot loop.
    pub fn new(name: impl Into<String>, index: PatternIndex, steps: Vec<Step>) -> Option<Self> {
        if steps.is_empty() {
            return None;
        }

        Some(Self {
            name: name.into(),
            index,
            steps: steps.into_boxed_slice(),
        })
    }

    /// Create a silent pattern of the given length
    pub fn silent(name: impl Into<String>, index: PatternIndex, len: usize) -> Option<Self> {
        Self::new(name, index, (0..len).map(|_| Step::silent()).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> PatternIndex {
        self.index
    }

    /// Number of steps (never 0)
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> SequencerResult<&Step> {
        self.steps.get(index).ok_or_else(|| SequencerError::StepOutOfRange {
            pattern: self.name.clone(),
            index,
            len: self.steps.len(),
        })
    }

    pub fn is_active(&self, index: usize, instrument: InstrumentId) -> SequencerResult<bool> {
        Ok(self.step(index)?.is_active(instrument))
    }

    /// Set one instrument's flag on one step
    ///
    /// Visible to the scheduler on the next pass over that step.
    pub fn set_step_active(
        &self,
        index: usize,
        instrument: InstrumentId,
        active: bool,
    ) -> SequencerResult<()> {
        self.step(index)?.set_active(instrument, active);
        Ok(())
    }

    /// Wrap an arbitrary cursor into this pattern's range
    pub fn wrap(&self, cursor: usize) -> usize {
        cursor % self.steps.len()
    }
}
