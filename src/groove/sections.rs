// Section Tempo - Per-window tempo from a beat timeline
// Aggregates instantaneous BPM into fixed-size, contiguous beat windows

use serde::{Deserialize, Serialize};

/// How instantaneous tempi inside a window are reduced to one BPM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregator {
    Median,
    Mean,
}

impl Aggregator {
    /// Parse from string representation
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "median" => Some(Aggregator::Median),
            "mean" => Some(Aggregator::Mean),
            _ => None,
        }
    }

    /// Reduce a non-empty window of values
    fn apply(&self, window: &[f64]) -> f64 {
        match self {
            Aggregator::Median => median(window),
            Aggregator::Mean => window.iter().sum::<f64>() / window.len() as f64,
        }
    }
}

/// A fixed-size window of beats with its aggregated tempo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Position of this section in the output (0-indexed, no gaps)
    pub index: usize,

    /// First beat of the window (inclusive)
    pub start_beat: usize,

    /// Last beat boundary of the window (exclusive)
    pub end_beat: usize,

    /// Aggregated tempo over the window's beat intervals
    pub bpm: f64,

    /// Timestamp of `start_beat` in seconds
    pub start_time: f64,

    /// Timestamp of `end_beat` in seconds
    pub end_time: f64,

    /// `end_time - start_time`
    pub duration: f64,
}

/// Instantaneous BPM between consecutive beats
///
/// Returns one value per interval (N-1 values for N beats). A zero-length
/// interval produces an infinite or NaN tempo rather than being skipped.
pub fn instant_tempo(beat_times: &[f64]) -> Vec<f64> {
    beat_times
        .windows(2)
        .map(|pair| 60.0 / (pair[1] - pair[0]))
        .collect()
}

/// Compute one tempo per window of `window_beats` beat intervals
///
/// The last window is truncated to whatever intervals remain; a window with
/// no intervals is never emitted.
pub fn section_tempo(
    beat_times: &[f64],
    window_beats: usize,
    aggregator: Aggregator,
) -> Vec<Section> {
    if window_beats == 0 {
        log::warn!("section_tempo called with an empty window, no sections produced");
        return Vec::new();
    }

    let tempi = instant_tempo(beat_times);
    let mut sections = Vec::with_capacity(tempi.len().div_ceil(window_beats));

    for (index, start) in (0..tempi.len()).step_by(window_beats).enumerate() {
        let end = (start + window_beats).min(tempi.len());
        let bpm = aggregator.apply(&tempi[start..end]);
        let start_time = beat_times[start];
        let end_time = beat_times[end];

        sections.push(Section {
            index,
            start_beat: start,
            end_beat: end,
            bpm,
            start_time,
            end_time,
            duration: end_time - start_time,
        });
    }

    log::debug!(
        "Segmented {} beats into {} sections of up to {} beats",
        beat_times.len(),
        sections.len(),
        window_beats
    );

    sections
}

/// Median with even-length windows averaging the two middle values
fn median(window: &[f64]) -> f64 {
    let mut sorted = window.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
