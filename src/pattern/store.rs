// PatternStore - explicit, owned catalogue of patterns

use crate::error::{SequencerError, SequencerResult};
use crate::instrument::InstrumentId;
use crate::pattern::grid::Pattern;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered catalogue of named patterns
///
/// Patterns are shared as `Arc<Pattern>` so the transport can hold the
/// active one while the store keeps accepting step edits.
#[derive(Debug, Default, Clone)]
pub struct PatternStore {
    patterns: Vec<Arc<Pattern>>,
    by_name: HashMap<String, usize>,
}

impl PatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern at the end of the catalogue
    ///
    /// Returns false (and leaves the store unchanged) if the name is taken.
    pub fn insert(&mut self, pattern: Pattern) -> bool {
        if self.by_name.contains_key(pattern.name()) {
            return false;
        }

        self.by_name
            .insert(pattern.name().to_string(), self.patterns.len());
        self.patterns.push(Arc::new(pattern));
        true
    }

    pub fn get_pattern(&self, name: &str) -> SequencerResult<Arc<Pattern>> {
        self.by_name
            .get(name)
            .map(|&i| Arc::clone(&self.patterns[i]))
            .ok_or_else(|| SequencerError::PatternNotFound(name.to_string()))
    }

    /// Pattern names in catalogue insertion order
    pub fn list_patterns(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.name()).collect()
    }

    /// Patterns in catalogue insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Pattern>> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Toggle one instrument on one step of a named pattern
    ///
    /// Fails without side effects on an unknown pattern or instrument or an
    /// out-of-range step. Takes effect immediately, including while the
    /// pattern is playing.
    pub fn set_step_active(
        &self,
        pattern: &str,
        step: usize,
        instrument: &str,
        active: bool,
    ) -> SequencerResult<()> {
        let pattern = self.get_pattern(pattern)?;
        let instrument: InstrumentId = instrument.parse()?;
        pattern.set_step_active(step, instrument, active)?;

        log::debug!(
            "{}[{}] {} -> {}",
            pattern.name(),
            step,
            instrument,
            if active { "on" } else { "off" }
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PatternStore {
        let mut store = PatternStore::new();
        assert!(store.insert(Pattern::silent("basichouse", 0, 16).unwrap()));
        assert!(store.insert(Pattern::silent("afrohouse", 1, 32).unwrap()));
        assert!(store.insert(Pattern::silent("breakbeat", 2, 16).unwrap()));
        store
    }

    #[test]
    fn test_list_patterns_in_insertion_order() {
        let store = store();
        assert_eq!(
            store.list_patterns(),
            vec!["basichouse", "afrohouse", "breakbeat"]
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_get_pattern() {
        let store = store();
        let pattern = store.get_pattern("afrohouse").unwrap();
        assert_eq!(pattern.len(), 32);
        assert_eq!(pattern.index(), 1);

        let err = store.get_pattern("polka").unwrap_err();
        assert_eq!(err, SequencerError::PatternNotFound("polka".into()));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut store = store();
        assert!(!store.insert(Pattern::silent("basichouse", 9, 32).unwrap()));
        assert_eq!(store.get_pattern("basichouse").unwrap().len(), 16);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_set_step_active_visible_through_shared_pattern() {
        let store = store();
        let playing = store.get_pattern("basichouse").unwrap();

        store.set_step_active("basichouse", 3, "clap", true).unwrap();
        assert!(playing.is_active(3, InstrumentId::Clap).unwrap());
    }

    #[test]
    fn test_set_step_active_errors() {
        let store = store();

        assert!(
            store
                .set_step_active("polka", 0, "kick", true)
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            store
                .set_step_active("basichouse", 0, "cowbell", true)
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            store
                .set_step_active("basichouse", 16, "kick", true)
                .unwrap_err()
                .is_range()
        );
    }
}
