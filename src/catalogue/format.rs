// Catalogue file format
//
// A JSON object mapping pattern name to an ordered list of step records:
//
//   { "basichouse": [ { "index": 0, "kick": { "on": true, "volume": 0.5 }, ... }, ... ] }
//
// Volume is repeated in every step record although it is instrument-scoped.
// On load the first occurrence per instrument (in catalogue order) wins; on
// save the registry's current volume is written into every record.

use crate::catalogue::CatalogueError;
use crate::instrument::{INSTRUMENT_COUNT, InstrumentId, InstrumentRegistry};
use crate::pattern::{Pattern, PatternIndex, PatternStore, Step};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One instrument's state within a step record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub on: bool,
    pub volume: f32,
}

/// One step of a pattern as stored in the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    #[serde(flatten)]
    pub instruments: BTreeMap<String, CellRecord>,
}

/// Ordered catalogue of patterns in file form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
    pub patterns: Vec<(String, Vec<StepRecord>)>,
}

/// Result of turning a catalogue into live objects
#[derive(Debug)]
pub struct LoadedCatalogue {
    pub store: PatternStore,
    /// Authoritative volume per instrument, indexed by `InstrumentId::index`
    pub volumes: [f32; INSTRUMENT_COUNT],
}

impl Catalogue {
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CatalogueError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogueError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn pattern_names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(name, _)| name.as_str())
    }

    /// Validate and build the pattern store and instrument volumes
    ///
    /// Rejects empty patterns, duplicate names, non-contiguous step indices,
    /// steps missing an instrument or naming an unknown one, and volumes
    /// outside [0, 1].
    pub fn load(&self) -> Result<LoadedCatalogue, CatalogueError> {
        let mut store = PatternStore::new();
        let mut volumes: [Option<f32>; INSTRUMENT_COUNT] = [None; INSTRUMENT_COUNT];
        let mut ignored_volumes = 0usize;

        for (position, (name, records)) in self.patterns.iter().enumerate() {
            if records.is_empty() {
                return Err(invalid(format!("pattern '{}' has no steps", name)));
            }

            let mut steps = Vec::with_capacity(records.len());
            for (expected, record) in records.iter().enumerate() {
                if record.index != expected {
                    return Err(invalid(format!(
                        "pattern '{}': step at position {} has index {}",
                        name, expected, record.index
                    )));
                }

                let mut active = [false; INSTRUMENT_COUNT];
                let mut seen = [false; INSTRUMENT_COUNT];

                for (instrument, cell) in &record.instruments {
                    let id: InstrumentId = instrument.parse().map_err(|_| {
                        invalid(format!(
                            "pattern '{}' step {}: unknown instrument '{}'",
                            name, expected, instrument
                        ))
                    })?;

                    if !cell.volume.is_finite() || !(0.0..=1.0).contains(&cell.volume) {
                        return Err(invalid(format!(
                            "pattern '{}' step {}: {} volume {} outside [0, 1]",
                            name, expected, id, cell.volume
                        )));
                    }

                    match volumes[id.index()] {
                        None => volumes[id.index()] = Some(cell.volume),
                        Some(v) if v != cell.volume => ignored_volumes += 1,
                        Some(_) => {}
                    }

                    active[id.index()] = cell.on;
                    seen[id.index()] = true;
                }

                if let Some(missing) = InstrumentId::ALL.iter().find(|id| !seen[id.index()]) {
                    return Err(invalid(format!(
                        "pattern '{}' step {}: missing instrument '{}'",
                        name, expected, missing
                    )));
                }

                steps.push(Step::new(active));
            }

            let pattern = Pattern::new(name.clone(), position as PatternIndex, steps)
                .ok_or_else(|| invalid(format!("pattern '{}' has no steps", name)))?;

            if !store.insert(pattern) {
                return Err(invalid(format!("duplicate pattern name '{}'", name)));
            }
        }

        if ignored_volumes > 0 {
            log::debug!(
                "Ignored {} per-step volumes that differ from the first occurrence",
                ignored_volumes
            );
        }

        Ok(LoadedCatalogue {
            store,
            volumes: InstrumentId::ALL.map(|id| volumes[id.index()].unwrap_or(id.default_volume())),
        })
    }

    /// Capture the store's current activation and the registry's current volumes
    pub fn from_store(store: &PatternStore, registry: &InstrumentRegistry) -> Self {
        let volumes = registry.volumes();

        let patterns = store
            .iter()
            .map(|pattern| {
                let records = pattern
                    .steps()
                    .iter()
                    .enumerate()
                    .map(|(index, step)| StepRecord {
                        index,
                        instruments: InstrumentId::ALL
                            .iter()
                            .map(|id| {
                                (
                                    id.name().to_string(),
                                    CellRecord {
                                        on: step.is_active(*id),
                                        volume: volumes[id.index()],
                                    },
                                )
                            })
                            .collect(),
                    })
                    .collect();
                (pattern.name().to_string(), records)
            })
            .collect();

        Self { patterns }
    }
}

fn invalid(message: String) -> CatalogueError {
    CatalogueError::InvalidStructure(message)
}

impl Serialize for Catalogue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.patterns.len()))?;
        for (name, steps) in &self.patterns {
            map.serialize_entry(name, steps)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Catalogue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogueVisitor;

        impl<'de> Visitor<'de> for CatalogueVisitor {
            type Value = Catalogue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of pattern name to step records")
            }

            // Visiting the map directly keeps the catalogue's own order
            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalogue, A::Error> {
                let mut patterns = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, steps)) = access.next_entry::<String, Vec<StepRecord>>()? {
                    patterns.push((name, steps));
                }
                Ok(Catalogue { patterns })
            }
        }

        deserializer.deserialize_map(CatalogueVisitor)
    }
}
