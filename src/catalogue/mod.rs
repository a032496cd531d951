// Catalogue - serialized form of the pattern store and the built-in presets

pub mod format;
pub mod presets;

pub use format::{Catalogue, CellRecord, LoadedCatalogue, StepRecord};
pub use presets::builtin_catalogue;

/// Catalogue error types
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("Invalid catalogue structure: {0}")]
    InvalidStructure(String),

    #[error("Catalogue not found under key '{0}'")]
    Missing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
