// Choreo - Beat-synced dance move sequencer
// Module declarations

pub mod arranger;
pub mod commands;
pub mod groove;
pub mod library;
pub mod pipeline;

pub use arranger::{FillSettings, PlanStep, Recommendation, recommend_sequence};
pub use groove::{Aggregator, Section, section_tempo};
pub use library::Move;
