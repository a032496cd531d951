// Sound emitter boundary - the audio-output side of an instrument trigger
//
// The scheduler never renders audio. It hands timestamped trigger events to a
// SoundEmitter, which queues them for whatever subsystem plays the samples.

use crate::instrument::InstrumentId;
use crate::messaging::channels::TriggerProducer;
use ringbuf::traits::Producer;
use std::sync::Mutex;

/// A single sound-emission request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerEvent {
    pub instrument: InstrumentId,
    /// Absolute output-clock time in seconds
    pub at: f64,
    /// Instrument volume read when the trigger was issued
    pub gain: f32,
}

/// Reasons a sound emitter can refuse a trigger
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmitError {
    #[error("trigger queue full")]
    QueueFull,

    #[error("sample unavailable: {0}")]
    SampleUnavailable(String),

    #[error("emitter disconnected")]
    Disconnected,
}

/// Capability the scheduler requires from the audio-output subsystem
///
/// `emit` is fire-and-forget: it must not block and must return quickly,
/// as it is called from the scheduler's polling thread.
pub trait SoundEmitter: Send + Sync {
    fn emit(&self, event: TriggerEvent) -> Result<(), EmitError>;
}

/// Emitter that pushes trigger events into a lock-free ringbuffer
/// drained by the audio thread
pub struct ChannelEmitter {
    producer: Mutex<TriggerProducer>,
}

impl ChannelEmitter {
    pub fn new(producer: TriggerProducer) -> Self {
        Self {
            producer: Mutex::new(producer),
        }
    }
}

impl SoundEmitter for ChannelEmitter {
    fn emit(&self, event: TriggerEvent) -> Result<(), EmitError> {
        let mut producer = self.producer.lock().map_err(|_| EmitError::Disconnected)?;
        producer.try_push(event).map_err(|_| EmitError::QueueFull)
    }
}

/// Emitter that discards every event (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEmitter;

impl SoundEmitter for NullEmitter {
    fn emit(&self, _event: TriggerEvent) -> Result<(), EmitError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::channels::create_trigger_channel;
    use ringbuf::traits::Consumer;

    fn event(at: f64) -> TriggerEvent {
        TriggerEvent {
            instrument: InstrumentId::Kick,
            at,
            gain: 0.5,
        }
    }

    #[test]
    fn test_channel_emitter_delivers_events() {
        let (tx, mut rx) = create_trigger_channel(4);
        let emitter = ChannelEmitter::new(tx);

        emitter.emit(event(0.0)).unwrap();
        emitter.emit(event(0.5)).unwrap();

        assert_eq!(rx.try_pop(), Some(event(0.0)));
        assert_eq!(rx.try_pop(), Some(event(0.5)));
        assert_eq!(rx.try_pop(), None);
    }

    #[test]
    fn test_channel_emitter_full_queue() {
        let (tx, _rx) = create_trigger_channel(1);
        let emitter = ChannelEmitter::new(tx);

        assert!(emitter.emit(event(0.0)).is_ok());
        assert_eq!(emitter.emit(event(0.5)), Err(EmitError::QueueFull));
    }

    #[test]
    fn test_null_emitter() {
        assert!(NullEmitter.emit(event(1.0)).is_ok());
    }
}
