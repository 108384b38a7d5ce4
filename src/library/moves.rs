// Moves - Catalog entries and tempo eligibility
// A move is one choreographic element with a fixed beat length

use serde::{Deserialize, Serialize};

/// Id of the always-available hold move
pub const FALLBACK_MOVE_ID: &str = "hold_groove";

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// How many beats the move occupies
    #[serde(alias = "beats", default = "default_beat_count")]
    pub beat_count: u32,

    /// Slowest tempo the move works at (inclusive)
    pub tempo_bpm_min: f64,

    /// Fastest tempo the move works at (inclusive)
    pub tempo_bpm_max: f64,

    /// Free-form style tags (e.g. "open", "footwork")
    #[serde(default)]
    pub style: Vec<String>,

    /// Energy label (e.g. "low", "neutral", "high")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<String>,
}

fn default_beat_count() -> u32 {
    1
}

impl Move {
    /// Check whether this move can be danced at `bpm`
    pub fn fits_tempo(&self, bpm: f64) -> bool {
        self.tempo_bpm_min <= bpm && bpm <= self.tempo_bpm_max
    }

    /// The one-beat hold that keeps every phrase fillable
    pub fn fallback() -> Self {
        Move {
            id: FALLBACK_MOVE_ID.to_string(),
            name: "Hold / Groove".to_string(),
            beat_count: 1,
            tempo_bpm_min: 0.0,
            tempo_bpm_max: f64::MAX,
            style: vec!["open".to_string()],
            energy: Some("neutral".to_string()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.id == FALLBACK_MOVE_ID
    }
}

/// Catalog moves usable at one tempo, plus the fallback hold
#[derive(Debug, Clone)]
pub struct EligibleSet {
    /// Tempo the set was filtered for
    pub bpm: f64,

    moves: Vec<Move>,
}

impl EligibleSet {
    /// All eligible moves, fallback last
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Never true: the fallback is always present
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The fallback entry of this set
    pub fn fallback(&self) -> &Move {
        // Pushed last by `eligible_moves`
        &self.moves[self.moves.len() - 1]
    }

    /// True when nothing from the catalog matched the tempo
    pub fn only_fallback(&self) -> bool {
        self.moves.len() == 1
    }
}

/// Filter a catalog down to the moves that fit `bpm`
///
/// The fallback hold is appended unconditionally so the result is never empty.
pub fn eligible_moves(catalog: &[Move], bpm: f64) -> EligibleSet {
    let mut moves: Vec<Move> = catalog
        .iter()
        .filter(|m| m.fits_tempo(bpm))
        .cloned()
        .collect();
    moves.push(Move::fallback());

    if moves.len() == 1 {
        log::warn!(
            "No catalog move fits {:.1} BPM, sequencing with holds only",
            bpm
        );
    } else {
        log::debug!("{} of {} catalog moves fit {:.1} BPM", moves.len() - 1, catalog.len(), bpm);
    }

    EligibleSet { bpm, moves }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_fits_tempo_inclusive() {
        let m = make_move("step", 1, 60.0, 180.0);
        assert!(m.fits_tempo(60.0));
        assert!(m.fits_tempo(180.0));
        assert!(m.fits_tempo(120.0));
        assert!(!m.fits_tempo(59.9));
        assert!(!m.fits_tempo(180.1));
    }

    #[test]
    fn test_eligible_members_fit_and_fallback_present() {
        let catalog = vec![
            make_move("slow", 2, 60.0, 90.0),
            make_move("mid", 4, 80.0, 130.0),
            make_move("fast", 1, 120.0, 200.0),
        ];

        for bpm in [40.0, 60.0, 85.0, 125.0, 200.0, 250.0] {
            let set = eligible_moves(&catalog, bpm);
            assert!(!set.is_empty());
            assert!(set.moves().iter().all(|m| m.fits_tempo(bpm)));
            assert!(set.moves().iter().any(|m| m.is_fallback()));
            assert!(set.fallback().is_fallback());
        }
    }

    #[test]
    fn test_no_match_collapses_to_fallback() {
        let catalog = vec![make_move("step", 1, 60.0, 180.0)];
        let set = eligible_moves(&catalog, 200.0);

        assert!(set.only_fallback());
        assert_eq!(set.moves(), &[Move::fallback()]);
    }

    #[test]
    fn test_empty_catalog() {
        let set = eligible_moves(&[], 120.0);
        assert_eq!(set.len(), 1);
        assert_eq!(set.moves()[0].id, FALLBACK_MOVE_ID);
    }

    #[test]
    fn test_catalog_order_preserved() {
        let catalog = vec![
            make_move("a", 1, 60.0, 180.0),
            make_move("b", 2, 60.0, 180.0),
            make_move("c", 4, 60.0, 180.0),
        ];
        let set = eligible_moves(&catalog, 100.0);
        let ids: Vec<&str> = set.moves().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", FALLBACK_MOVE_ID]);
    }

    #[test]
    fn test_deserialize_beats_alias() {
        let m: Move = serde_json::from_str(
            r#"{"id": "box", "name": "Box Step", "beats": 4, "tempo_bpm_min": 70, "tempo_bpm_max": 140, "style": ["hip-hop"]}"#,
        )
        .unwrap();
        assert_eq!(m.beat_count, 4);
        assert_eq!(m.style, vec!["hip-hop".to_string()]);
        assert!(m.energy.is_none());
    }

    #[test]
    fn test_deserialize_default_beats() {
        let m: Move = serde_json::from_str(
            r#"{"id": "clap", "name": "Clap", "tempo_bpm_min": 70, "tempo_bpm_max": 140}"#,
        )
        .unwrap();
        assert_eq!(m.beat_count, 1);
    }
}
