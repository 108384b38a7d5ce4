// Move Library - Catalog entries, loading, and tempo eligibility

pub mod catalog;
pub mod moves;

pub use catalog::{CatalogError, load_catalog, parse_catalog, validate_catalog};
pub use moves::{EligibleSet, FALLBACK_MOVE_ID, Move, eligible_moves};
