//! The persisted resume state

use serde::{Deserialize, Serialize};

/// Number of lines of a source file that have already been processed
///
/// `line` is also the zero-based index of the next line to deliver. A
/// missing record is equivalent to `line = 0`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CheckpointRecord {
    /// Lines fully processed so far
    pub line: u64,
}

impl CheckpointRecord {
    /// Create a record pointing at the given line count
    pub fn at(line: u64) -> Self {
        Self { line }
    }

    /// Whether the record points at the start of the file
    pub fn is_beginning(&self) -> bool {
        self.line == 0
    }

    /// Decode a record from its JSON form
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encode the record as compact JSON (`{"line":N}`)
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl std::fmt::Display for CheckpointRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}", self.line)
    }
}
