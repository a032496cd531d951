// Sequencer - transport, output clocks and the lookahead scheduler

pub mod clock;
pub mod scheduler;
pub mod tempo;
pub mod thread;
pub mod transport;

pub use clock::{ManualClock, OutputClock, SampleClock, SystemClock};
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerState, SchedulerStats};
pub use tempo::Tempo;
pub use thread::SchedulerThread;
pub use transport::{SharedTransportState, Transport, TransportState};
