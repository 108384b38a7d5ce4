// Commands - Typed entry points over the sequencing engine
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::arranger::{self, FillSettings, Recommendation};
use crate::groove::{self, Aggregator, BeatAnalysis, Section};
use crate::library::{self, Move};

#[derive(Debug, Serialize)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<E: std::fmt::Display> From<E> for CommandError {
    fn from(error: E) -> Self {
        CommandError {
            message: error.to_string(),
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

// ==================== INPUT COMMANDS ====================

/// Load and validate a beat analysis file
pub fn load_beats(path: &Path) -> CommandResult<BeatAnalysis> {
    groove::load_beat_analysis(path).map_err(|e| CommandError {
        message: format!("Failed to load beats from {}: {}", path.display(), e),
    })
}

/// Load and validate a move catalog file
pub fn load_catalog(path: &Path) -> CommandResult<Vec<Move>> {
    library::load_catalog(path).map_err(|e| CommandError {
        message: format!("Failed to load catalog from {}: {}", path.display(), e),
    })
}

// ==================== GROOVE COMMANDS ====================

#[derive(Debug, Deserialize)]
pub struct SectionTempoInput {
    pub beat_times: Vec<f64>,
    pub window_beats: usize,
    pub aggregator: String,
}

/// Per-window tempo over a beat timeline
pub fn section_tempo_command(input: SectionTempoInput) -> CommandResult<Vec<Section>> {
    let aggregator = Aggregator::from_string(&input.aggregator).ok_or_else(|| CommandError {
        message: format!("Unknown aggregator '{}', expected median or mean", input.aggregator),
    })?;

    Ok(groove::section_tempo(
        &input.beat_times,
        input.window_beats,
        aggregator,
    ))
}

// ==================== ARRANGER COMMANDS ====================

/// Phrases generated when the caller does not ask for a count
pub const DEFAULT_PHRASE_COUNT: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RecommendInput {
    pub beat_times: Vec<f64>,
    pub bpm: f64,
    pub catalog: Vec<Move>,

    /// Clamped to the phrases the timeline holds; defaults to at most
    /// `DEFAULT_PHRASE_COUNT`
    #[serde(default)]
    pub phrase_count: Option<usize>,

    #[serde(default)]
    pub settings: FillSettings,

    /// Drawn at random when absent and reported back
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct RecommendOutput {
    pub seed: u64,
    pub phrase_count: usize,

    #[serde(flatten)]
    pub recommendation: Recommendation,
}

/// Generate a timed move sequence
pub fn recommend_command(input: RecommendInput) -> CommandResult<RecommendOutput> {
    library::validate_catalog(&input.catalog)?;

    if !input.bpm.is_finite() || input.bpm <= 0.0 {
        return Err(CommandError {
            message: format!("Tempo must be finite and positive, got {}", input.bpm),
        });
    }

    let capacity = groove::phrase_capacity(input.beat_times.len(), input.settings.phrase_length);
    let phrase_count = match input.phrase_count {
        Some(requested) => {
            let clamped = requested.clamp(1, capacity);
            if clamped != requested {
                log::warn!(
                    "Requested {} phrases, timeline holds {}; using {}",
                    requested,
                    capacity,
                    clamped
                );
            }
            clamped
        }
        None => capacity.min(DEFAULT_PHRASE_COUNT),
    };
    let seed = input.seed.unwrap_or_else(rand::random);

    log::info!(
        "Recommending {} phrases of {} beats at {:.1} BPM (seed {})",
        phrase_count,
        input.settings.phrase_length,
        input.bpm,
        seed
    );

    let recommendation = arranger::recommend_sequence_seeded(
        &input.beat_times,
        input.bpm,
        &input.catalog,
        phrase_count,
        &input.settings,
        seed,
    );

    Ok(RecommendOutput {
        seed,
        phrase_count,
        recommendation,
    })
}
