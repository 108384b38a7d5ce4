// Phrase Filling - Fills one fixed-length beat phrase with moves
// Greedy selection balancing variety (recency) against usage spread

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{DEFAULT_RECENT_WINDOW, SelectionState};
use crate::library::{EligibleSet, Move};

/// Settings for phrase filling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FillSettings {
    /// Beats per phrase (an "8-count" by default)
    pub phrase_length: u32,

    /// How many recent picks are kept out of the primary candidate pool
    pub recent_window: usize,

    /// Random pick happens among this many top-ranked candidates
    pub shortlist: usize,

    /// Upper bound on selections per phrase
    pub max_attempts: u32,
}

impl Default for FillSettings {
    fn default() -> Self {
        FillSettings {
            phrase_length: 8,
            recent_window: DEFAULT_RECENT_WINDOW,
            shortlist: 3,
            max_attempts: 200,
        }
    }
}

/// Whether a phrase reached its target beat length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseStatus {
    /// Beat sum equals the target length
    Complete,

    /// Attempt budget ran out first
    Partial,
}

/// One filled phrase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilledPhrase {
    /// Selected moves in order
    pub moves: Vec<Move>,

    /// Beat length the phrase was asked to fill
    pub target_beats: u32,

    pub status: PhraseStatus,
}

impl FilledPhrase {
    /// Sum of the selected moves' beat counts
    pub fn total_beats(&self) -> u32 {
        self.moves.iter().map(|m| m.beat_count).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.status == PhraseStatus::Complete
    }
}

/// Fill one phrase of `settings.phrase_length` beats
///
/// Algorithm per selection:
/// 1. Candidates are eligible moves that fit in the remaining beats
/// 2. Recently used ids are excluded, unless that leaves nothing
/// 3. With no candidates at all, the fallback hold is forced
/// 4. Rank by usage (ascending), then beat count (descending)
/// 5. Pick uniformly among the top `shortlist` candidates
///
/// Every pick updates `state`, which outlives the phrase so variety and
/// usage balance carry across phrase boundaries.
pub fn fill_phrase<R: Rng + ?Sized>(
    eligible: &EligibleSet,
    state: &mut SelectionState,
    settings: &FillSettings,
    rng: &mut R,
) -> FilledPhrase {
    let target = settings.phrase_length;
    let mut moves: Vec<Move> = Vec::new();
    let mut total = 0u32;
    let mut attempts = 0u32;

    while total < target && attempts < settings.max_attempts {
        let beats_left = target - total;

        let mut pool = candidates(eligible, beats_left, state, true);
        if pool.is_empty() {
            pool = candidates_with_repeats(eligible, beats_left, state);
        }

        let pick = if pool.is_empty() {
            eligible.fallback()
        } else {
            rank_candidates(&mut pool, state);
            let shortlist = settings.shortlist.max(1).min(pool.len());
            pool[rng.gen_range(0..shortlist)]
        };

        total += pick.beat_count;
        state.record(&pick.id);
        moves.push(pick.clone());
        attempts += 1;
    }

    let status = if total == target {
        PhraseStatus::Complete
    } else {
        log::warn!(
            "Phrase stopped at {}/{} beats after {} attempts",
            total,
            target,
            attempts
        );
        PhraseStatus::Partial
    };

    FilledPhrase {
        moves,
        target_beats: target,
        status,
    }
}

/// Moves that fit in `beats_left`, optionally skipping recent picks
fn candidates<'a>(
    eligible: &'a EligibleSet,
    beats_left: u32,
    state: &SelectionState,
    exclude_recent: bool,
) -> Vec<&'a Move> {
    eligible
        .moves()
        .iter()
        .filter(|m| m.beat_count >= 1 && m.beat_count <= beats_left)
        .filter(|m| !exclude_recent || !state.recent.contains(&m.id))
        .collect()
}

fn candidates_with_repeats<'a>(
    eligible: &'a EligibleSet,
    beats_left: u32,
    state: &SelectionState,
) -> Vec<&'a Move> {
    candidates(eligible, beats_left, state, false)
}

/// Least used first; among equals, longer moves first
fn rank_candidates(candidates: &mut [&Move], state: &SelectionState) {
    candidates.sort_by(|a, b| {
        state
            .usage
            .count(&a.id)
            .cmp(&state.usage.count(&b.id))
            .then_with(|| b.beat_count.cmp(&a.beat_count))
    });
}
