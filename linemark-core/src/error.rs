//! Error types for the checkpointed reader
//!
//! Precondition failures (`AlreadyOpen`, `NotOpened`, `AlreadyReading`,
//! `ReadInProgress`) are returned before any state changes. I/O failures
//! carry the path they happened on.

use crate::checkpoint::CheckpointRecord;
use crate::streaming::ReadSummary;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the reader, its checkpoint store and its line source
#[derive(Debug, Error)]
pub enum ReaderError {
    /// `open` was called on a reader that already has a file
    #[error("file already opened: {}", path.display())]
    AlreadyOpen { path: PathBuf },

    /// The path does not name an existing, readable file
    #[error("file does not exist or is not readable: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    /// An operation that needs a file was called before `open`
    #[error("file not opened")]
    NotOpened,

    /// A read session is already active on this reader
    #[error("file is already being read")]
    AlreadyReading,

    /// The checkpoint cannot be reset while a read session is active
    #[error("cannot reset checkpoint while reading")]
    ReadInProgress,

    /// A checkpoint record exists but could not be parsed
    #[error("malformed checkpoint at {}", path.display())]
    MalformedCheckpoint {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A checkpoint record could not be read or written
    #[error("checkpoint storage failed at {}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source file failed while being streamed
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The line handler failed; the line is not counted as processed
    #[error("line handler failed on line {line}")]
    Handler {
        line: u64,
        /// Progress when the session ended, excluding the failed line
        checkpoint: CheckpointRecord,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A read session finished but a checkpoint save failed along the way
    ///
    /// `summary` holds the progress the session reached, which may be
    /// ahead of what is stored.
    #[error("read session reached line {} but its checkpoint was not saved", summary.checkpoint.line)]
    Unsaved {
        summary: ReadSummary,
        #[source]
        source: Box<ReaderError>,
    },

    /// Invalid configuration parameters
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl ReaderError {
    /// Whether the error is a precondition violation rather than an I/O failure
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ReaderError::AlreadyOpen { .. }
                | ReaderError::NotOpened
                | ReaderError::AlreadyReading
                | ReaderError::ReadInProgress
        )
    }

    /// Whether a checkpoint could not be read or written
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            ReaderError::Persistence { .. } | ReaderError::Unsaved { .. }
        )
    }

    /// Progress of the session that ended with this error, if any
    pub fn progress(&self) -> Option<CheckpointRecord> {
        match self {
            ReaderError::Handler { checkpoint, .. } => Some(*checkpoint),
            ReaderError::Unsaved { summary, .. } => Some(summary.checkpoint),
            _ => None,
        }
    }
}

/// Result type for reader operations
pub type ReaderResult<T> = Result<T, ReaderError>;
