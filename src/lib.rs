// Drum sequencer - Library exports for tests and benchmarks

pub mod catalogue;
pub mod config;
pub mod error;
pub mod instrument;
pub mod machine;
pub mod messaging;
pub mod pattern;
pub mod persistence;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use catalogue::{Catalogue, CatalogueError, builtin_catalogue};
pub use config::{ConfigError, EngineConfig};
pub use error::{SequencerError, SequencerResult};
pub use instrument::{
    ChannelEmitter, EmitError, InstrumentId, InstrumentRegistry, NullEmitter, SoundEmitter,
    TriggerEvent,
};
pub use machine::{DrumMachine, MachineError};
pub use messaging::channels::{create_notification_channel, create_trigger_channel};
pub use pattern::{Pattern, PatternStore, Step};
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
pub use sequencer::{
    ManualClock, OutputClock, SampleClock, Scheduler, SchedulerConfig, SchedulerState,
    SchedulerThread, SystemClock, Tempo, Transport, TransportState,
};
