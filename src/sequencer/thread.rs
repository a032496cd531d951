// Scheduler thread - runs the lookahead poll loop off the control thread

use crate::sequencer::clock::OutputClock;
use crate::sequencer::scheduler::Scheduler;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

const THREAD_NAME: &str = "drum-scheduler";

/// Handle to a running scheduler thread
///
/// Dropping the handle stops and joins the thread.
pub struct SchedulerThread {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<Scheduler>>,
}

impl SchedulerThread {
    /// Spawn the poll loop
    ///
    /// The thread polls the scheduler with `clock.now()` and then sleeps for
    /// the scheduler's current poll interval, until `shutdown` is called.
    pub fn spawn(mut scheduler: Scheduler, clock: Arc<dyn OutputClock>) -> std::io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                log::debug!("Scheduler thread started");
                while flag.load(Ordering::Acquire) {
                    scheduler.poll(clock.now());
                    thread::sleep(scheduler.poll_interval());
                }
                log::debug!("Scheduler thread exiting: {:?}", scheduler.stats());
                scheduler
            })?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the loop and give the scheduler back (for its stats)
    ///
    /// Returns `None` if the thread panicked.
    pub fn shutdown(mut self) -> Option<Scheduler> {
        self.stop_and_join()
    }

    fn stop_and_join(&mut self) -> Option<Scheduler> {
        self.running.store(false, Ordering::Release);
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(scheduler) => Some(scheduler),
            Err(_) => {
                log::error!("Scheduler thread panicked");
                None
            }
        }
    }
}

impl Drop for SchedulerThread {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
