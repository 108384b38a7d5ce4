// Catalog loading - Reads the move library from JSON
// Validation lives here so the sequencer can trust every entry it gets

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::moves::Move;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Move at position {0} has an empty id")]
    EmptyId(usize),

    #[error("Duplicate move id: {0}")]
    DuplicateId(String),

    #[error("Move {0} must span at least one beat")]
    ZeroBeats(String),

    #[error("Move {id} has invalid tempo range {min}..{max}")]
    InvalidTempoRange { id: String, min: f64, max: f64 },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Parse a catalog from a JSON array of moves
pub fn parse_catalog(json: &str) -> CatalogResult<Vec<Move>> {
    let moves: Vec<Move> = serde_json::from_str(json)?;
    validate_catalog(&moves)?;
    Ok(moves)
}

/// Load a catalog from a JSON file
pub fn load_catalog(path: &Path) -> CatalogResult<Vec<Move>> {
    let contents = std::fs::read_to_string(path)?;
    let moves = parse_catalog(&contents)?;

    log::info!("Loaded {} moves from {}", moves.len(), path.display());
    Ok(moves)
}

/// Check the entry-level guarantees the sequencer relies on
pub fn validate_catalog(moves: &[Move]) -> CatalogResult<()> {
    let mut seen = HashSet::with_capacity(moves.len());

    for (position, m) in moves.iter().enumerate() {
        if m.id.trim().is_empty() {
            return Err(CatalogError::EmptyId(position));
        }
        if !seen.insert(m.id.as_str()) {
            return Err(CatalogError::DuplicateId(m.id.clone()));
        }
        if m.beat_count == 0 {
            return Err(CatalogError::ZeroBeats(m.id.clone()));
        }
        if !m.tempo_bpm_min.is_finite()
            || !m.tempo_bpm_max.is_finite()
            || m.tempo_bpm_min > m.tempo_bpm_max
        {
            return Err(CatalogError::InvalidTempoRange {
                id: m.id.clone(),
                min: m.tempo_bpm_min,
                max: m.tempo_bpm_max,
            });
        }
    }

    Ok(())
}
