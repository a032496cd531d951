// DrumMachine - wires pattern store, instrument registry, transport and scheduler

use crate::catalogue::{Catalogue, CatalogueError, builtin_catalogue};
use crate::config::{ConfigError, EngineConfig};
use crate::error::SequencerResult;
use crate::instrument::{InstrumentRegistry, SoundEmitter};
use crate::messaging::channels::{
    NotificationConsumer, NotificationProducer, create_notification_channel,
};
use crate::messaging::notification::Notification;
use crate::pattern::{Pattern, PatternStore};
use crate::persistence::{KeyValueStore, persist_catalogue, restore_catalogue};
use crate::sequencer::{
    OutputClock, Scheduler, SchedulerStats, SchedulerThread, Tempo, Transport, TransportState,
};
use ringbuf::traits::Consumer;
use std::sync::Arc;

/// Errors raised while building a drum machine
#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scheduler thread error: {0}")]
    Thread(#[from] std::io::Error),
}

/// One playback session over a pattern catalogue
///
/// Owns the pattern store and the transport; shares the instrument registry
/// and transport state with the scheduler thread once started.
pub struct DrumMachine {
    config: EngineConfig,
    patterns: PatternStore,
    registry: Arc<InstrumentRegistry>,
    transport: Transport,
    thread: Option<SchedulerThread>,
    notification_tx: Option<NotificationProducer>,
    notification_rx: NotificationConsumer,
}

impl DrumMachine {
    /// Build from the built-in presets
    pub fn new(config: EngineConfig, emitter: Arc<dyn SoundEmitter>) -> Result<Self, MachineError> {
        let catalogue = builtin_catalogue()?;
        Self::from_catalogue(config, &catalogue, emitter)
    }

    /// Build from the catalogue persisted in `kv`, falling back to the
    /// built-in presets when nothing is stored yet
    pub fn restore(
        config: EngineConfig,
        kv: &dyn KeyValueStore,
        emitter: Arc<dyn SoundEmitter>,
    ) -> Result<Self, MachineError> {
        let catalogue = match restore_catalogue(kv, &config.catalogue_key) {
            Ok(catalogue) => catalogue,
            Err(CatalogueError::Missing(key)) => {
                log::info!("Nothing stored under '{}', using built-in presets", key);
                builtin_catalogue()?
            }
            Err(e) => return Err(e.into()),
        };
        Self::from_catalogue(config, &catalogue, emitter)
    }

    pub fn from_catalogue(
        config: EngineConfig,
        catalogue: &Catalogue,
        emitter: Arc<dyn SoundEmitter>,
    ) -> Result<Self, MachineError> {
        config.validate()?;

        let loaded = catalogue.load()?;
        let registry = Arc::new(InstrumentRegistry::with_volumes(emitter, loaded.volumes));
        let initial = initial_pattern(&loaded.store, &config.default_pattern)?;
        let tempo = Tempo::new(config.default_tempo).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        log::info!(
            "Loaded {} patterns, starting on '{}' at {}",
            loaded.store.len(),
            initial.name(),
            tempo
        );

        let (notification_tx, notification_rx) =
            create_notification_channel(config.notification_capacity);

        Ok(Self {
            transport: Transport::new(initial, tempo),
            patterns: loaded.store,
            registry,
            config,
            thread: None,
            notification_tx: Some(notification_tx),
            notification_rx,
        })
    }

    /// Write the catalogue into the persistent store under the configured key
    pub fn initialize(&self, kv: &dyn KeyValueStore) -> Result<(), CatalogueError> {
        persist_catalogue(kv, &self.config.catalogue_key, &self.patterns, &self.registry)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn patterns(&self) -> &PatternStore {
        &self.patterns
    }

    pub fn registry(&self) -> &Arc<InstrumentRegistry> {
        &self.registry
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn list_patterns(&self) -> Vec<&str> {
        self.patterns.list_patterns()
    }

    pub fn get_pattern(&self, name: &str) -> SequencerResult<Arc<Pattern>> {
        self.patterns.get_pattern(name)
    }

    pub fn current_pattern(&self) -> Arc<Pattern> {
        self.transport.pattern()
    }

    pub fn state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn select_pattern(&mut self, name: &str) -> SequencerResult<()> {
        let pattern = self.patterns.get_pattern(name)?;
        self.transport.select_pattern(pattern);
        Ok(())
    }

    pub fn set_tempo(&mut self, steps_per_minute: f64) -> SequencerResult<()> {
        self.transport.set_tempo(steps_per_minute)
    }

    pub fn play(&mut self) {
        self.transport.play();
    }

    pub fn pause(&mut self) {
        self.transport.pause();
    }

    pub fn stop(&mut self) {
        self.transport.stop();
    }

    pub fn set_step_active(
        &self,
        pattern: &str,
        step: usize,
        instrument: &str,
        active: bool,
    ) -> SequencerResult<()> {
        self.patterns.set_step_active(pattern, step, instrument, active)
    }

    /// Set an instrument's volume (clamped to [0, 1]); returns the stored value
    pub fn set_volume(&self, instrument: &str, volume: f32) -> SequencerResult<f32> {
        self.registry.set_volume_by_name(instrument, volume)
    }

    /// Build a scheduler for this session, for driving `poll` by hand
    ///
    /// The first scheduler built gets the notification channel.
    pub fn scheduler(&mut self) -> Scheduler {
        let scheduler = Scheduler::new(
            self.transport.shared_state(),
            Arc::clone(&self.registry),
            self.config.scheduler_config(),
        );
        match self.notification_tx.take() {
            Some(tx) => scheduler.with_notifications(tx),
            None => scheduler,
        }
    }

    /// Start the scheduler thread on `clock` (no-op if already running)
    pub fn start(&mut self, clock: Arc<dyn OutputClock>) -> Result<(), MachineError> {
        if self.thread.is_some() {
            return Ok(());
        }
        let scheduler = self.scheduler();
        self.thread = Some(SchedulerThread::spawn(scheduler, clock)?);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(SchedulerThread::is_running)
    }

    /// Stop the transport and the scheduler thread
    pub fn shutdown(&mut self) -> Option<SchedulerStats> {
        self.transport.stop();
        let scheduler = self.thread.take()?.shutdown()?;
        Some(scheduler.stats())
    }

    /// Notifications reported by the scheduler since the last call
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notification_rx.pop_iter().collect()
    }
}

fn initial_pattern(store: &PatternStore, preferred: &str) -> Result<Arc<Pattern>, CatalogueError> {
    if let Ok(pattern) = store.get_pattern(preferred) {
        return Ok(pattern);
    }

    let first = store
        .iter()
        .next()
        .cloned()
        .ok_or_else(|| CatalogueError::InvalidStructure("catalogue has no patterns".to_string()))?;
    log::warn!(
        "Default pattern '{}' not in catalogue, starting on '{}'",
        preferred,
        first.name()
    );
    Ok(first)
}
