// Persistence - key-value storage of the pattern catalogue

pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use crate::catalogue::{Catalogue, CatalogueError};
use crate::instrument::InstrumentRegistry;
use crate::pattern::PatternStore;

/// Default key the catalogue is stored under
pub const DEFAULT_CATALOGUE_KEY: &str = "patterns";

/// Serialize the live catalogue and write it under `key`
pub fn persist_catalogue(
    kv: &dyn KeyValueStore,
    key: &str,
    patterns: &PatternStore,
    registry: &InstrumentRegistry,
) -> Result<(), CatalogueError> {
    let json = Catalogue::from_store(patterns, registry).to_json()?;
    kv.put(key, &json)?;
    log::info!(
        "Persisted {} patterns under '{}' ({} bytes)",
        patterns.len(),
        key,
        json.len()
    );
    Ok(())
}

/// Read and parse the catalogue stored under `key`
pub fn restore_catalogue(kv: &dyn KeyValueStore, key: &str) -> Result<Catalogue, CatalogueError> {
    let json = kv
        .get(key)?
        .ok_or_else(|| CatalogueError::Missing(key.to_string()))?;
    let catalogue = Catalogue::from_json(&json)?;
    log::info!(
        "Restored {} patterns from '{}'",
        catalogue.patterns.len(),
        key
    );
    Ok(catalogue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::builtin_catalogue;
    use crate::instrument::{InstrumentId, NullEmitter};
    use std::sync::Arc;

    #[test]
    fn test_persist_and_restore() {
        let loaded = builtin_catalogue().unwrap().load().unwrap();
        let registry = InstrumentRegistry::with_volumes(Arc::new(NullEmitter), loaded.volumes);
        let kv = MemoryStore::new();

        loaded
            .store
            .set_step_active("hiphop", 1, "harmony", true)
            .unwrap();
        persist_catalogue(&kv, DEFAULT_CATALOGUE_KEY, &loaded.store, &registry).unwrap();

        let restored = restore_catalogue(&kv, DEFAULT_CATALOGUE_KEY)
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(restored.store.list_patterns(), loaded.store.list_patterns());
        assert!(
            restored
                .store
                .get_pattern("hiphop")
                .unwrap()
                .is_active(1, InstrumentId::Harmony)
                .unwrap()
        );
    }

    #[test]
    fn test_restore_missing_key() {
        let kv = MemoryStore::new();
        let err = restore_catalogue(&kv, "nothing").unwrap_err();
        assert!(matches!(err, CatalogueError::Missing(key) if key == "nothing"));
    }
}
