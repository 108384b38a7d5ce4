// Generation trace
// Append-only JSONL record of what each stage of a run produced

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Stages of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Reading the beat analysis and catalog
    Load,

    /// Section tempo segmentation
    Sections,

    /// Phrase filling
    Sequence,

    /// Placement on the beat timeline
    Flatten,
}

/// One line of the trace file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    /// RFC 3339 creation time
    pub timestamp: String,

    pub stage: Stage,

    /// Run progress [0.0, 1.0]
    pub progress: f32,

    pub message: String,

    /// Stage output counts and flags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl TraceEntry {
    pub fn new(stage: Stage, progress: f32, message: impl Into<String>) -> Self {
        TraceEntry {
            timestamp: Utc::now().to_rfc3339(),
            stage,
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
            data: None,
        }
    }

    /// Attach structured data
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    fn to_json_line(&self) -> Result<String, serde_json::Error> {
        Ok(format!("{}\n", serde_json::to_string(self)?))
    }
}

/// Appends trace entries to a JSONL file, creating it on first write
pub struct TraceWriter {
    file_path: PathBuf,
}

impl TraceWriter {
    pub fn new(file_path: PathBuf) -> Self {
        TraceWriter { file_path }
    }

    pub fn write(&self, entry: &TraceEntry) -> Result<(), TraceError> {
        self.write_batch(std::slice::from_ref(entry))
    }

    pub fn write_batch(&self, entries: &[TraceEntry]) -> Result<(), TraceError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        for entry in entries {
            file.write_all(entry.to_json_line()?.as_bytes())?;
        }

        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Read all entries back, skipping blank lines
pub fn read_trace_file(path: &Path) -> Result<Vec<TraceEntry>, TraceError> {
    let contents = std::fs::read_to_string(path)?;

    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(TraceError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_progress_clamping() {
        assert_eq!(TraceEntry::new(Stage::Load, -0.5, "x").progress, 0.0);
        assert_eq!(TraceEntry::new(Stage::Load, 1.5, "x").progress, 1.0);
    }

    #[test]
    fn test_entry_with_data() {
        let entry = TraceEntry::new(Stage::Sequence, 0.5, "Filled phrases")
            .with_data(serde_json::json!({"phrases": 4, "partial": 0}));

        assert_eq!(entry.stage, Stage::Sequence);
        assert_eq!(entry.data.unwrap()["phrases"], 4);
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let json = serde_json::to_string(&Stage::Flatten).unwrap();
        assert_eq!(json, "\"flatten\"");
    }

    #[test]
    fn test_write_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let trace_path = temp_dir.path().join("trace.jsonl");
        let writer = TraceWriter::new(trace_path.clone());

        writer.write(&TraceEntry::new(Stage::Load, 0.0, "Start")).unwrap();
        writer
            .write_batch(&[
                TraceEntry::new(Stage::Sequence, 0.5, "Phrases"),
                TraceEntry::new(Stage::Flatten, 1.0, "Done"),
            ])
            .unwrap();

        let entries = read_trace_file(writer.path()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].stage, Stage::Load);
        assert_eq!(entries[2].stage, Stage::Flatten);
        assert_eq!(entries[2].progress, 1.0);
    }
}
