use drum_sequencer::sequencer::SampleClock;
use drum_sequencer::{
    ChannelEmitter, DrumMachine, EngineConfig, FileStore, MemoryStore, create_trigger_channel,
};
use ringbuf::traits::Consumer;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

// Trigger ringbuffer sizing: at 960 steps/min with all 8 instruments active
// a 100 ms lookahead queues at most ~16 events; 1024 leaves plenty of slack
const TRIGGER_RINGBUFFER_CAPACITY: usize = 1024;
const SAMPLE_RATE: f64 = 48000.0;
const BUFFER_FRAMES: usize = 480; // 10 ms at 48 kHz

fn main() {
    env_logger::init();

    println!("=== Drum Sequencer ===");

    let mut args = std::env::args().skip(1);
    let pattern = args.next();
    let tempo = args.next().and_then(|t| t.parse::<f64>().ok());
    let seconds = args.next().and_then(|s| s.parse::<f64>().ok()).unwrap_or(8.0);

    let config = match EngineConfig::load_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };

    let (trigger_tx, mut trigger_rx) = create_trigger_channel(TRIGGER_RINGBUFFER_CAPACITY);
    let emitter = Arc::new(ChannelEmitter::new(trigger_tx));

    let store: Box<dyn drum_sequencer::KeyValueStore> = match config
        .resolved_store_dir()
        .map(FileStore::open)
    {
        Some(Ok(store)) => Box::new(store),
        Some(Err(e)) => {
            eprintln!("Warning: store unavailable ({}), using memory store", e);
            Box::new(MemoryStore::new())
        }
        None => Box::new(MemoryStore::new()),
    };

    let mut machine = match DrumMachine::restore(config, store.as_ref(), emitter) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };

    if let Err(e) = machine.initialize(store.as_ref()) {
        eprintln!("Warning: failed to persist catalogue: {}", e);
    }

    println!("Patterns: {}", machine.list_patterns().join(", "));

    if let Some(name) = pattern {
        if let Err(e) = machine.select_pattern(&name) {
            eprintln!("ERROR: {}", e);
            return;
        }
    }
    if let Some(tempo) = tempo {
        if let Err(e) = machine.set_tempo(tempo) {
            eprintln!("ERROR: {}", e);
            return;
        }
    }

    // Stand-in for the audio callback: advances the output clock one buffer
    // at a time and drains the triggers that fall inside each buffer
    let clock = match SampleClock::new(SAMPLE_RATE) {
        Ok(clock) => clock,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return;
        }
    };
    let audio_clock = clock.clone();
    let audio_running = Arc::new(AtomicBool::new(true));
    let audio_flag = Arc::clone(&audio_running);
    let audio = thread::spawn(move || {
        let mut pending = Vec::new();
        let started = Instant::now();
        let mut buffers = 0u64;
        while audio_flag.load(Ordering::Acquire) {
            pending.extend(trigger_rx.pop_iter());
            let buffer_end = audio_clock.current_frame() + BUFFER_FRAMES as u64;
            pending.retain(|event: &drum_sequencer::TriggerEvent| {
                let frame = audio_clock.seconds_to_frame(event.at);
                if frame < buffer_end {
                    println!(
                        "{:>8.3}s  {:<8} gain {:.2}  (+{} frames)",
                        event.at,
                        event.instrument,
                        event.gain,
                        audio_clock.frames_from_now(event.at)
                    );
                    false
                } else {
                    true
                }
            });
            audio_clock.advance(BUFFER_FRAMES);
            buffers += 1;

            let target = Duration::from_secs_f64(buffers as f64 * BUFFER_FRAMES as f64 / SAMPLE_RATE);
            if let Some(wait) = target.checked_sub(started.elapsed()) {
                thread::sleep(wait);
            }
        }
    });

    println!(
        "Playing '{}' at {} for {:.1}s\n",
        machine.current_pattern().name(),
        machine.transport().tempo(),
        seconds
    );

    if let Err(e) = machine.start(Arc::new(clock)) {
        eprintln!("ERROR: {}", e);
        return;
    }
    machine.play();
    thread::sleep(Duration::from_secs_f64(seconds.max(0.0)));

    let stats = machine.shutdown();
    audio_running.store(false, Ordering::Release);
    if audio.join().is_err() {
        eprintln!("ERROR: audio thread panicked");
    }

    for notification in machine.drain_notifications() {
        eprintln!("{}", notification);
    }
    if let Some(stats) = stats {
        println!(
            "\n{} steps, {} triggers, {} failures",
            stats.steps_scheduled, stats.triggers_issued, stats.trigger_failures
        );
    }
}
