// Built-in preset catalogue

use crate::catalogue::CatalogueError;
use crate::catalogue::format::Catalogue;

/// Preset patterns shipped with the crate, in catalogue format
pub const BUILTIN_CATALOGUE_JSON: &str = include_str!("../../presets/catalogue.json");

/// Parse the built-in presets
pub fn builtin_catalogue() -> Result<Catalogue, CatalogueError> {
    Catalogue::from_json(BUILTIN_CATALOGUE_JSON)
}
