// Scheduler - lookahead step scheduling
//
// Each poll looks a short window ahead on the output clock and hands every
// step that falls inside it to the instrument registry, stamped with its
// exact due time. Due times accumulate from an ideal grid (previous due
// time + one step), never from "now", so polling jitter does not drift.

use crate::instrument::InstrumentRegistry;
use crate::messaging::channels::NotificationProducer;
use crate::messaging::notification::{Notification, NotificationCategory};
use crate::pattern::Pattern;
use crate::sequencer::transport::{SharedTransportState, TransportState};
use ringbuf::traits::Producer;
use std::sync::Arc;
use std::time::Duration;

/// Fraction of a step the poll interval may not exceed
const POLLS_PER_STEP: f64 = 8.0;

/// Shortest sleep between polls, however fast the tempo
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Upper bound on steps handed to the registry by a single poll
pub const MAX_STEPS_PER_POLL: usize = 256;

/// Timing parameters of the lookahead loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    /// How far ahead of the output clock steps are scheduled, in seconds
    pub lookahead: f64,
    /// Upper bound on the time between two polls
    pub poll_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lookahead: 0.1,
            poll_interval: Duration::from_millis(25),
        }
    }
}

/// Scheduler state machine: Idle -> Running -> {Paused, Idle}, Paused -> Running | Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Counters for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub steps_scheduled: u64,
    pub triggers_issued: u64,
    pub trigger_failures: u64,
    /// Times the due time was re-anchored after the poll loop fell behind
    pub stalls: u64,
}

pub struct Scheduler {
    transport: Arc<SharedTransportState>,
    registry: Arc<InstrumentRegistry>,
    config: SchedulerConfig,
    state: SchedulerState,
    /// Due time of the next step not yet handed to the registry
    next_due: Option<f64>,
    /// Last transport generation observed; a change forces a re-anchor
    seen_generation: u64,
    notifications: Option<NotificationProducer>,
    stats: SchedulerStats,
}

impl Scheduler {
    pub fn new(
        transport: Arc<SharedTransportState>,
        registry: Arc<InstrumentRegistry>,
        config: SchedulerConfig,
    ) -> Self {
        let seen_generation = transport.generation();
        Self {
            transport,
            registry,
            config,
            state: SchedulerState::Idle,
            next_due: None,
            seen_generation,
            notifications: None,
            stats: SchedulerStats::default(),
        }
    }

    /// Report trigger failures and stalls on a notification channel
    pub fn with_notifications(mut self, notifications: NotificationProducer) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn next_due(&self) -> Option<f64> {
        self.next_due
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Time to sleep between polls at the current tempo
    pub fn poll_interval(&self) -> Duration {
        // Compared in f64: a very slow tempo has steps longer than Duration::MAX
        let max = self.transport.tempo().step_duration_seconds() / POLLS_PER_STEP;
        if max < self.config.poll_interval.as_secs_f64() {
            Duration::from_secs_f64(max).max(MIN_POLL_INTERVAL)
        } else {
            self.config.poll_interval
        }
    }

    /// Schedule every step whose due time falls within the lookahead window
    ///
    /// `now` is the current output-clock time in seconds. Returns the number
    /// of steps scheduled by this poll, at most `MAX_STEPS_PER_POLL`; steps
    /// left over are picked up by the next poll.
    pub fn poll(&mut self, now: f64) -> usize {
        let generation = self.transport.generation();
        if generation != self.seen_generation {
            // Play, pause or stop happened since the last poll
            self.seen_generation = generation;
            self.next_due = None;
        }

        match self.transport.state() {
            TransportState::Stopped => {
                self.state = SchedulerState::Idle;
                self.next_due = None;
                return 0;
            }
            TransportState::Paused => {
                self.state = SchedulerState::Paused;
                self.next_due = None;
                return 0;
            }
            TransportState::Playing => self.state = SchedulerState::Running,
        }

        let mut due = match self.next_due {
            Some(due) if due >= now - self.config.lookahead => due,
            Some(due) => self.reanchor(due, now),
            None => now,
        };

        let horizon = now + self.config.lookahead;
        let mut scheduled = 0;

        while due < horizon && scheduled < MAX_STEPS_PER_POLL {
            // Pause/stop issued mid-poll takes effect before the next step
            if self.transport.generation() != self.seen_generation {
                break;
            }
            let Some((pattern, index)) = self.transport.take_step() else {
                break;
            };
            self.fire_step(&pattern, index, due);
            scheduled += 1;

            // Tempo is read per step so a change only affects unscheduled steps
            let next = due + self.transport.tempo().step_duration_seconds();
            if next <= due {
                // Step shorter than the clock's float resolution: one step per window
                log::debug!("Step duration below clock resolution at {:.4}s", due);
                due = horizon;
                break;
            }
            due = next;
        }

        self.next_due = Some(due);
        scheduled
    }

    /// Drop the steps missed while the poll loop was starved
    fn reanchor(&mut self, late_due: f64, now: f64) -> f64 {
        self.stats.stalls += 1;
        let message = format!(
            "Scheduler fell {:.1} ms behind, skipping missed steps",
            (now - late_due) * 1000.0
        );
        log::warn!("{}", message);
        self.notify(Notification::warning(
            NotificationCategory::Scheduler,
            now,
            message,
        ));
        now
    }

    fn fire_step(&mut self, pattern: &Pattern, index: usize, due: f64) {
        self.stats.steps_scheduled += 1;

        // take_step always returns an in-range index
        let Some(step) = pattern.steps().get(index) else {
            return;
        };

        log::trace!("{}[{}] due at {:.4}s", pattern.name(), index, due);

        for instrument in step.active_instruments() {
            match self.registry.trigger(instrument, due) {
                Ok(()) => self.stats.triggers_issued += 1,
                Err(e) => {
                    // One broken sound must not silence the rest of the step
                    self.stats.trigger_failures += 1;
                    log::warn!("{} (step {} of '{}')", e, index, pattern.name());
                    self.notify(Notification::error(
                        NotificationCategory::Trigger,
                        due,
                        e.to_string(),
                    ));
                }
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        if let Some(tx) = self.notifications.as_mut() {
            // Full channel: drop rather than block the scheduling thread
            let _ = tx.try_push(notification);
        }
    }
}
