// Arranger - Move sequencing over beat phrases
// Fills phrases with catalog moves and places them on the beat timeline

pub mod state;
pub mod phrase;
pub mod sequence;
pub mod timeline;

// Re-export main types
pub use state::{RecentWindow, SelectionState, UsageCounters};
pub use phrase::{FillSettings, FilledPhrase, PhraseStatus, fill_phrase};
pub use sequence::{
    PhraseSummary, Recommendation, build_sequence, recommend_sequence, recommend_sequence_seeded,
};
pub use timeline::{FlatPlan, PlanStep, flatten};
