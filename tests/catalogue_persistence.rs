// Integration test: catalogue persistence through the file-backed store
//
// Edits made in one session must come back after a restart, and malformed
// stored data must be reported rather than silently replaced.

use drum_sequencer::persistence::{persist_catalogue, restore_catalogue};
use drum_sequencer::{
    Catalogue, CatalogueError, DrumMachine, EngineConfig, FileStore, InstrumentId, KeyValueStore,
    MachineError, NullEmitter, builtin_catalogue,
};
use std::sync::Arc;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> EngineConfig {
    EngineConfig {
        store_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    }
}

#[test]
fn test_first_run_writes_presets() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let store = FileStore::open(dir.path()).unwrap();

    let machine = DrumMachine::restore(config, &store, Arc::new(NullEmitter)).unwrap();
    machine.initialize(&store).unwrap();

    let path = store.path_for("patterns");
    assert!(path.exists(), "catalogue file missing at {:?}", path);

    let stored = restore_catalogue(&store, "patterns").unwrap();
    let names: Vec<&str> = stored.pattern_names().collect();
    assert_eq!(
        names,
        vec![
            "basichouse",
            "deephouse",
            "techhouse",
            "breakbeat",
            "hiphop",
            "garage",
            "afrohouse",
            "latinhouse"
        ]
    );
}

#[test]
fn test_edits_survive_restart() {
    let dir = TempDir::new().unwrap();

    {
        let store = FileStore::open(dir.path()).unwrap();
        let machine =
            DrumMachine::restore(config_in(&dir), &store, Arc::new(NullEmitter)).unwrap();
        machine
            .set_step_active("techhouse", 5, "bongo1", true)
            .unwrap();
        machine
            .set_step_active("afrohouse", 31, "kick", false)
            .unwrap();
        machine.set_volume("harmony", 0.7).unwrap();
        machine.set_volume("snare", 4.0).unwrap(); // clamped to 1.0
        machine.initialize(&store).unwrap();
    }

    let store = FileStore::open(dir.path()).unwrap();
    let machine = DrumMachine::restore(config_in(&dir), &store, Arc::new(NullEmitter)).unwrap();

    let techhouse = machine.get_pattern("techhouse").unwrap();
    assert!(techhouse.is_active(5, InstrumentId::Bongo1).unwrap());
    let afrohouse = machine.get_pattern("afrohouse").unwrap();
    assert!(!afrohouse.is_active(31, InstrumentId::Kick).unwrap());
    assert_eq!(afrohouse.len(), 32);

    assert_eq!(machine.registry().volume(InstrumentId::Harmony), 0.7);
    assert_eq!(machine.registry().volume(InstrumentId::Snare), 1.0);
    assert_eq!(machine.registry().volume(InstrumentId::Kick), 0.5);
}

#[test]
fn test_untouched_catalogue_matches_presets() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    let machine = DrumMachine::new(config_in(&dir), Arc::new(NullEmitter)).unwrap();
    persist_catalogue(&store, "patterns", machine.patterns(), machine.registry()).unwrap();

    let stored = restore_catalogue(&store, "patterns").unwrap();
    assert_eq!(stored, builtin_catalogue().unwrap());
}

#[test]
fn test_custom_key() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let config = EngineConfig {
        catalogue_key: "live-set".to_string(),
        ..config_in(&dir)
    };

    let machine = DrumMachine::new(config.clone(), Arc::new(NullEmitter)).unwrap();
    machine.set_step_active("hiphop", 0, "harmony", true).unwrap();
    machine.initialize(&store).unwrap();

    assert!(store.get("live-set").unwrap().is_some());
    assert!(store.get("patterns").unwrap().is_none());

    let restored = DrumMachine::restore(config, &store, Arc::new(NullEmitter)).unwrap();
    assert!(
        restored
            .get_pattern("hiphop")
            .unwrap()
            .is_active(0, InstrumentId::Harmony)
            .unwrap()
    );
}

#[test]
fn test_corrupt_store_is_reported() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store.put("patterns", "{ this is not json").unwrap();

    let result = DrumMachine::restore(config_in(&dir), &store, Arc::new(NullEmitter));
    assert!(matches!(
        result,
        Err(MachineError::Catalogue(CatalogueError::Json(_)))
    ));
}

#[test]
fn test_stored_catalogue_with_unknown_instrument_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store
        .put(
            "patterns",
            r#"{"odd": [{"index": 0, "kick": {"on": true, "volume": 0.5}, "cowbell": {"on": true, "volume": 0.5}}]}"#,
        )
        .unwrap();

    let catalogue = restore_catalogue(&store, "patterns").unwrap();
    assert!(matches!(
        catalogue.load(),
        Err(CatalogueError::InvalidStructure(_))
    ));
    assert!(DrumMachine::restore(config_in(&dir), &store, Arc::new(NullEmitter)).is_err());
}

#[test]
fn test_remove_falls_back_to_presets() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    let machine = DrumMachine::new(config_in(&dir), Arc::new(NullEmitter)).unwrap();
    machine.set_step_active("garage", 1, "clap", true).unwrap();
    machine.initialize(&store).unwrap();
    assert!(store.remove("patterns").unwrap());

    let machine = DrumMachine::restore(config_in(&dir), &store, Arc::new(NullEmitter)).unwrap();
    let garage = machine.get_pattern("garage").unwrap();
    let presets = builtin_catalogue().unwrap().load().unwrap();
    let preset_garage = presets.store.get_pattern("garage").unwrap();
    assert_eq!(
        garage.is_active(1, InstrumentId::Clap).unwrap(),
        preset_garage.is_active(1, InstrumentId::Clap).unwrap()
    );
}

#[test]
fn test_catalogue_json_is_readable() {
    let catalogue = builtin_catalogue().unwrap();
    let json = catalogue.to_json_pretty().unwrap();
    let reparsed = Catalogue::from_json(&json).unwrap();
    assert_eq!(reparsed, catalogue);
}
