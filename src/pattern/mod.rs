// Pattern store - the catalogue of step-grid rhythm patterns

pub mod grid;
pub mod step;
pub mod store;

pub use grid::{Pattern, PatternIndex};
pub use step::Step;
pub use store::PatternStore;
