// Groove - Beat timeline input and section tempo
// Everything that reasons about beat indices and their timestamps

pub mod beats;
pub mod sections;

pub use beats::{AnalysisError, BeatAnalysis, load_beat_analysis, phrase_capacity};
pub use sections::{Aggregator, Section, instant_tempo, section_tempo};
