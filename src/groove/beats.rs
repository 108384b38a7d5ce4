// Beat Analysis - Beat timeline and global tempo from the beat detector
// Loads detector output and derives count labels and phrase capacity

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Beats per bar assumed for count labels (4/4)
pub const BEATS_PER_BAR: u8 = 4;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid beat analysis JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Global tempo must be finite and positive, got {0}")]
    InvalidTempo(f64),

    #[error("Beat times must be finite and strictly increasing (index {0})")]
    UnorderedBeats(usize),

    #[error("Expected {expected} count labels, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Output of beat detection: one global tempo plus beat timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatAnalysis {
    /// Global tempo estimate in BPM
    pub tempo: f64,

    /// Beat timestamps in seconds, strictly increasing
    pub beat_times: Vec<f64>,

    /// Count label per beat (1..=4 in 4/4)
    #[serde(default)]
    pub counts: Vec<u8>,
}

impl BeatAnalysis {
    /// Build an analysis with default 4/4 counts
    pub fn new(tempo: f64, beat_times: Vec<f64>) -> Self {
        let counts = default_counts(beat_times.len());
        BeatAnalysis {
            tempo,
            beat_times,
            counts,
        }
    }

    /// Parse and validate detector JSON
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let mut analysis: BeatAnalysis = serde_json::from_str(json)?;
        if analysis.counts.is_empty() {
            analysis.counts = default_counts(analysis.beat_times.len());
        }
        analysis.validate()?;
        Ok(analysis)
    }

    /// Number of complete beat intervals in the timeline
    pub fn complete_beats(&self) -> usize {
        self.beat_times.len().saturating_sub(1)
    }

    /// How many whole phrases fit the timeline (at least one)
    pub fn auto_phrase_count(&self, phrase_length: u32) -> usize {
        phrase_capacity(self.beat_times.len(), phrase_length)
    }

    /// In-bar count (1-4) of a beat boundary
    pub fn count_at(&self, beat: usize) -> Option<u8> {
        self.counts.get(beat).copied()
    }

    fn validate(&self) -> Result<(), AnalysisError> {
        if !self.tempo.is_finite() || self.tempo <= 0.0 {
            return Err(AnalysisError::InvalidTempo(self.tempo));
        }

        for (i, &t) in self.beat_times.iter().enumerate() {
            if !t.is_finite() || (i > 0 && t <= self.beat_times[i - 1]) {
                return Err(AnalysisError::UnorderedBeats(i));
            }
        }

        if self.counts.len() != self.beat_times.len() {
            return Err(AnalysisError::CountMismatch {
                expected: self.beat_times.len(),
                actual: self.counts.len(),
            });
        }

        Ok(())
    }
}

/// Load a beat analysis from a JSON file
pub fn load_beat_analysis(path: &Path) -> Result<BeatAnalysis, AnalysisError> {
    let contents = std::fs::read_to_string(path)?;
    let analysis = BeatAnalysis::from_json(&contents)?;

    log::info!(
        "Loaded {} beats at {:.1} BPM from {}",
        analysis.beat_times.len(),
        analysis.tempo,
        path.display()
    );

    Ok(analysis)
}

/// Whole phrases that fit between `beat_count` beat timestamps, at least one
pub fn phrase_capacity(beat_count: usize, phrase_length: u32) -> usize {
    if phrase_length == 0 {
        return 1;
    }
    (beat_count.saturating_sub(1) / phrase_length as usize).max(1)
}

/// Count labels 1, 2, 3, 4, 1, 2, ...
fn default_counts(beats: usize) -> Vec<u8> {
    (0..beats).map(|i| (i % BEATS_PER_BAR as usize) as u8 + 1).collect()
}
