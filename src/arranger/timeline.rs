// Timeline Flattening - Projects a phrase plan onto real beat timestamps
// Stops cleanly when the beat timeline has no boundary left for a move

use serde::{Deserialize, Serialize};

use super::phrase::FilledPhrase;

/// One move placed on the beat timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub move_id: String,
    pub name: String,
    pub beat_count: u32,

    /// Beat index the move starts on
    pub start_beat_index: usize,

    /// Beat boundary index the move ends on (exclusive)
    pub end_beat_index: usize,

    /// Seconds
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
}

impl PlanStep {
    /// One-line listing with 1-based beat numbers
    pub fn describe(&self) -> String {
        format!(
            "{} — beats {}-{} ({:.2}s → {:.2}s, {:.2}s)",
            self.name,
            self.start_beat_index + 1,
            self.end_beat_index,
            self.start_time,
            self.end_time,
            self.duration
        )
    }
}

/// Flattened plan plus whether beat data ran out
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatPlan {
    pub steps: Vec<PlanStep>,

    /// True when a move had no end boundary and the plan was cut there
    pub truncated: bool,
}

/// Walk phrases and moves in order, assigning each move its beat span
///
/// A move needs an end boundary inside the timeline; the first move without
/// one ends the plan. Nothing after it is emitted, not even from later
/// phrases, and no timestamp is ever extrapolated.
pub fn flatten(phrases: &[FilledPhrase], beat_times: &[f64]) -> FlatPlan {
    let mut plan = FlatPlan::default();
    let mut cursor = 0usize;

    for phrase in phrases {
        for m in &phrase.moves {
            let start = cursor;
            let end = cursor + m.beat_count as usize;

            if end >= beat_times.len() {
                log::debug!(
                    "Beat timeline exhausted at beat {} ({} beats available), plan cut after {} steps",
                    start,
                    beat_times.len(),
                    plan.steps.len()
                );
                plan.truncated = true;
                return plan;
            }

            let start_time = beat_times[start];
            let end_time = beat_times[end];
            plan.steps.push(PlanStep {
                move_id: m.id.clone(),
                name: m.name.clone(),
                beat_count: m.beat_count,
                start_beat_index: start,
                end_beat_index: end,
                start_time,
                end_time,
                duration: end_time - start_time,
            });
            cursor = end;
        }
    }

    plan
}
