// Sequence Assembly - Multi-phrase move plans with run-wide variety
// Builds phrases against one shared selection state, then places them on beats

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::phrase::{FillSettings, FilledPhrase, PhraseStatus, fill_phrase};
use super::state::SelectionState;
use super::timeline::{PlanStep, flatten};
use crate::library::{Move, eligible_moves};

/// Per-phrase summary carried alongside the flattened steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseSummary {
    pub index: usize,
    pub status: PhraseStatus,
    pub total_beats: u32,
    pub move_count: usize,
}

/// Result of a full recommendation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Timed moves, in order
    pub steps: Vec<PlanStep>,

    /// Completeness of every generated phrase
    pub phrases: Vec<PhraseSummary>,

    /// True when the beat timeline ran out before the plan did
    pub truncated: bool,
}

impl Recommendation {
    /// Every phrase reached its target length
    pub fn all_phrases_complete(&self) -> bool {
        self.phrases.iter().all(|p| p.status == PhraseStatus::Complete)
    }
}

/// Fill `phrase_count` phrases for one tempo
///
/// Usage counters and the recency window are shared across all phrases of
/// the run, so a move picked at the end of one phrase is still suppressed at
/// the start of the next.
pub fn build_sequence<R: Rng + ?Sized>(
    catalog: &[Move],
    bpm: f64,
    phrase_count: usize,
    settings: &FillSettings,
    rng: &mut R,
) -> Vec<FilledPhrase> {
    let eligible = eligible_moves(catalog, bpm);
    let mut state = SelectionState::new(settings.recent_window);
    let mut phrases = Vec::new();

    for index in 0..phrase_count {
        let phrase = fill_phrase(&eligible, &mut state, settings, rng);
        log::debug!(
            "Phrase {}: {} moves, {}/{} beats",
            index,
            phrase.moves.len(),
            phrase.total_beats(),
            phrase.target_beats
        );
        phrases.push(phrase);
    }

    phrases
}

/// Generate a timed move sequence for a beat timeline
///
/// Algorithm:
/// 1. Filter the catalog to moves that fit `bpm` (plus the fallback hold)
/// 2. Fill `phrase_count` phrases with shared usage/recency state
/// 3. Flatten the phrases onto `beat_times`, stopping when boundaries run out
pub fn recommend_sequence<R: Rng + ?Sized>(
    beat_times: &[f64],
    bpm: f64,
    catalog: &[Move],
    phrase_count: usize,
    settings: &FillSettings,
    rng: &mut R,
) -> Recommendation {
    let phrases = build_sequence(catalog, bpm, phrase_count, settings, rng);
    let plan = flatten(&phrases, beat_times);

    let summaries: Vec<PhraseSummary> = phrases
        .iter()
        .enumerate()
        .map(|(index, phrase)| PhraseSummary {
            index,
            status: phrase.status,
            total_beats: phrase.total_beats(),
            move_count: phrase.moves.len(),
        })
        .collect();

    let partial = summaries
        .iter()
        .filter(|p| p.status == PhraseStatus::Partial)
        .count();
    if partial > 0 {
        log::warn!("{} of {} phrases are incomplete", partial, summaries.len());
    }
    if plan.truncated {
        log::warn!(
            "Beat timeline ({} beats) too short for the plan, kept {} steps",
            beat_times.len(),
            plan.steps.len()
        );
    }

    log::info!(
        "Recommended {} steps over {} phrases at {:.1} BPM",
        plan.steps.len(),
        summaries.len(),
        bpm
    );

    Recommendation {
        steps: plan.steps,
        phrases: summaries,
        truncated: plan.truncated,
    }
}

/// `recommend_sequence` with a fixed seed for reproducible output
pub fn recommend_sequence_seeded(
    beat_times: &[f64],
    bpm: f64,
    catalog: &[Move],
    phrase_count: usize,
    settings: &FillSettings,
    seed: u64,
) -> Recommendation {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    recommend_sequence(beat_times, bpm, catalog, phrase_count, settings, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::FALLBACK_MOVE_ID;

    fn make_move(id: &str, beats: u32, min: f64, max: f64) -> Move {
        Move {
            id: id.to_string(),
            name: id.to_uppercase(),
            beat_count: beats,
            tempo_bpm_min: min,
            tempo_bpm_max: max,
            style: Vec::new(),
            energy: None,
        }
    }

    fn varied_catalog() -> Vec<Move> {
        vec![
            make_move("step_touch", 2, 70.0, 140.0),
            make_move("body_roll", 4, 60.0, 110.0),
            make_move("hit", 1, 80.0, 180.0),
            make_move("slide", 2, 90.0, 150.0),
            make_move("spin", 4, 100.0, 160.0),
            make_move("kick_ball_change", 2, 90.0, 170.0),
        ]
    }

    fn half_second_beats(count: usize) -> Vec<f64> {
        (0..count).map(|i| i as f64 * 0.5).collect()
    }

    #[test]
    fn test_single_step_catalog_scenario() {
        let beats = half_second_beats(9);
        let catalog = vec![make_move("step", 1, 60.0, 180.0)];

        let settings = FillSettings::default();
        let rec = recommend_sequence_seeded(&beats, 120.0, &catalog, 1, &settings, 5);

        assert_eq!(rec.steps.len(), 8);
        assert!(!rec.truncated);
        assert!(rec.all_phrases_complete());
        for (i, step) in rec.steps.iter().enumerate() {
            assert_eq!(step.start_beat_index, i);
            assert_eq!(step.end_beat_index, i + 1);
            assert!((step.duration - 0.5).abs() < 1e-9);
        }
        assert_eq!(rec.steps.last().map(|s| s.end_beat_index), Some(8));
    }

    #[test]
    fn test_short_timeline_truncates() {
        let beats = [0.0, 0.5, 1.0];
        let settings = FillSettings::default();
        let rec = recommend_sequence_seeded(&beats, 120.0, &varied_catalog(), 1, &settings, 9);

        assert!(rec.steps.len() <= 2);
        assert!(rec.truncated);
        assert!(rec.steps.iter().all(|s| s.end_beat_index < beats.len()));
        // The phrase itself is still complete; only its placement was cut
        assert!(rec.all_phrases_complete());
    }

    #[test]
    fn test_no_tempo_match_yields_holds() {
        let beats = half_second_beats(17);
        let catalog = vec![make_move("step", 1, 60.0, 180.0)];

        let settings = FillSettings::default();
        let rec = recommend_sequence_seeded(&beats, 200.0, &catalog, 1, &settings, 1);

        assert_eq!(rec.steps.len(), 8);
        assert!(rec.steps.iter().all(|s| s.move_id == FALLBACK_MOVE_ID && s.beat_count == 1));
    }

    #[test]
    fn test_empty_timeline() {
        let settings = FillSettings::default();
        let rec = recommend_sequence_seeded(&[], 120.0, &varied_catalog(), 4, &settings, 0);
        assert!(rec.steps.is_empty());
        assert_eq!(rec.phrases.len(), 4);
    }

    #[test]
    fn test_build_sequence_phrases_complete() {
        let settings = FillSettings::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let phrases = build_sequence(&varied_catalog(), 120.0, 6, &settings, &mut rng);

        assert_eq!(phrases.len(), 6);
        for phrase in &phrases {
            assert!(phrase.is_complete());
            assert_eq!(phrase.total_beats(), 8);
            for m in &phrase.moves {
                assert!(m.fits_tempo(120.0));
            }
        }
    }

    #[test]
    fn test_huge_recent_window() {
        let settings = FillSettings {
            recent_window: usize::MAX,
            ..FillSettings::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let phrases = build_sequence(&varied_catalog(), 120.0, 2, &settings, &mut rng);

        assert_eq!(phrases.len(), 2);
        assert!(phrases.iter().all(|p| p.is_complete()));
    }

    #[test]
    fn test_recency_carries_across_phrases() {
        let catalog = vec![
            make_move("a", 4, 60.0, 180.0),
            make_move("b", 4, 60.0, 180.0),
            make_move("c", 4, 60.0, 180.0),
            make_move("d", 4, 60.0, 180.0),
        ];
        let settings = FillSettings {
            shortlist: 1,
            ..FillSettings::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let phrases = build_sequence(&catalog, 120.0, 2, &settings, &mut rng);
        let ids: Vec<Vec<&str>> = phrases
            .iter()
            .map(|p| p.moves.iter().map(|m| m.id.as_str()).collect())
            .collect();

        // Fresh state per phrase would have picked a, b again
        assert_eq!(ids, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_usage_spreads_across_catalog() {
        let settings = FillSettings::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let catalog = varied_catalog();
        let phrases = build_sequence(&catalog, 120.0, 8, &settings, &mut rng);

        // Every move eligible at 120 BPM gets used at least once over 64 beats
        for m in catalog.iter().filter(|m| m.fits_tempo(120.0)) {
            assert!(
                phrases.iter().any(|p| p.moves.iter().any(|pm| pm.id == m.id)),
                "{} never selected",
                m.id
            );
        }
    }

    #[test]
    fn test_same_seed_same_recommendation() {
        let beats = half_second_beats(65);
        let settings = FillSettings::default();

        let catalog = varied_catalog();

        let first = recommend_sequence_seeded(&beats, 110.0, &catalog, 8, &settings, 1234);
        let second = recommend_sequence_seeded(&beats, 110.0, &catalog, 8, &settings, 1234);

        assert_eq!(first.steps, second.steps);
        assert_eq!(first.phrases, second.phrases);
    }

    #[test]
    fn test_partial_phrases_reported() {
        let beats = half_second_beats(33);
        let settings = FillSettings {
            max_attempts: 2,
            ..FillSettings::default()
        };

        let rec = recommend_sequence_seeded(&beats, 120.0, &[], 2, &settings, 0);

        assert!(!rec.all_phrases_complete());
        assert_eq!(rec.phrases[0].status, PhraseStatus::Partial);
        assert_eq!(rec.phrases[0].total_beats, 2);
        // Partial phrases are still placed back to back
        assert_eq!(rec.steps.len(), 4);
        assert_eq!(rec.steps[3].end_beat_index, 4);
    }

    #[test]
    fn test_plan_steps_within_bounds() {
        let settings = FillSettings::default();
        let catalog = varied_catalog();

        for seed in 0..10 {
            let beats = half_second_beats(20 + seed as usize);
            let rec = recommend_sequence_seeded(&beats, 120.0, &catalog, 4, &settings, seed);
            for step in &rec.steps {
                assert!(step.end_beat_index < beats.len());
                assert!(step.end_beat_index > step.start_beat_index);
                assert!(step.duration >= 0.0);
            }
        }
    }
}
