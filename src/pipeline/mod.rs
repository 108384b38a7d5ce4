// Pipeline monitoring
// Progress trace for a generation run

pub mod trace;

pub use trace::{Stage, TraceEntry, TraceError, TraceWriter, read_trace_file};
