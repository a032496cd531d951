// Sequencer errors - surfaced synchronously to the caller of a mutating operation

use crate::instrument::InstrumentId;

/// Result type for sequencer operations
pub type SequencerResult<T> = Result<T, SequencerError>;

/// Errors produced by the pattern store, instrument registry and transport
///
/// NotFound and Range errors never leave transport or pattern state modified.
/// Trigger failures are recovered by the scheduler and only reach callers
/// that invoke `InstrumentRegistry::trigger` directly.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SequencerError {
    #[error("Pattern not found: {0}")]
    PatternNotFound(String),

    #[error("Instrument not found: {0}")]
    InstrumentNotFound(String),

    #[error("Step {index} out of range for pattern '{pattern}' ({len} steps)")]
    StepOutOfRange {
        pattern: String,
        index: usize,
        len: usize,
    },

    #[error("Invalid tempo: {0} steps/min (must be > 0)")]
    InvalidTempo(f64),

    #[error("Invalid sample rate: {0} Hz (must be > 0)")]
    InvalidSampleRate(f64),

    #[error("Trigger failed for {instrument}: {reason}")]
    TriggerFailure {
        instrument: InstrumentId,
        reason: String,
    },
}

impl SequencerError {
    /// Unknown pattern or instrument name
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SequencerError::PatternNotFound(_) | SequencerError::InstrumentNotFound(_)
        )
    }

    /// Out-of-bounds step index, non-positive tempo or sample rate
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            SequencerError::StepOutOfRange { .. }
                | SequencerError::InvalidTempo(_)
                | SequencerError::InvalidSampleRate(_)
        )
    }

    pub fn is_trigger_failure(&self) -> bool {
        matches!(self, SequencerError::TriggerFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(SequencerError::PatternNotFound("x".into()).is_not_found());
        assert!(SequencerError::InstrumentNotFound("cowbell".into()).is_not_found());
        assert!(SequencerError::InvalidTempo(0.0).is_range());

        let err = SequencerError::StepOutOfRange {
            pattern: "basichouse".into(),
            index: 16,
            len: 16,
        };
        assert!(err.is_range());
        assert!(!err.is_not_found());

        let err = SequencerError::TriggerFailure {
            instrument: InstrumentId::Kick,
            reason: "queue full".into(),
        };
        assert!(err.is_trigger_failure());
    }

    #[test]
    fn test_error_messages() {
        let err = SequencerError::StepOutOfRange {
            pattern: "basichouse".into(),
            index: 20,
            len: 16,
        };
        assert_eq!(
            err.to_string(),
            "Step 20 out of range for pattern 'basichouse' (16 steps)"
        );
        assert_eq!(
            SequencerError::InvalidTempo(-1.0).to_string(),
            "Invalid tempo: -1 steps/min (must be > 0)"
        );
    }
}
