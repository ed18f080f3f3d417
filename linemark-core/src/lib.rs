//! Resumable line-by-line reading of large text files
//!
//! This crate streams a text file one line at a time, hands every line to
//! a caller-supplied async handler and persists how many lines have been
//! handled. A later run opened on the same file resumes at the first line
//! that was not handled yet instead of starting over.
//!
//! # Architecture
//!
//! - **Checkpoint store** ([`checkpoint`]): loads and saves a single
//!   [`CheckpointRecord`] per source file, by default as a JSON file next to it
//! - **Line source** ([`streaming::LineSource`]): pulls lines lazily from a
//!   buffered async reader
//! - **Checkpointed reader** ([`TextFileReader`]): drives the line source,
//!   skips lines handled by earlier runs, calls the handler and saves the
//!   checkpoint every `save_every` lines and when a session ends
//!
//! # Example
//!
//! ```rust,no_run
//! use linemark_core::{ReaderConfig, TextFileReader};
//!
//! # async fn run() -> Result<(), linemark_core::ReaderError> {
//! let config = ReaderConfig::builder().save_every(100).build()?;
//! let mut reader = TextFileReader::with_config(config)?;
//! reader.open("example/test.txt")?;
//!
//! let total = reader.count_lines().await?;
//! let summary = reader
//!     .read(|line, number| async move {
//!         println!("{number}/{total}: {line}");
//!     })
//!     .await?;
//!
//! assert_eq!(summary.checkpoint.line, total);
//! # Ok(())
//! # }
//! ```

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod reader;
pub mod streaming;

pub use checkpoint::{CheckpointRecord, CheckpointStore, JsonFileStore, MemoryCheckpointStore};
pub use config::{ReaderConfig, ReaderConfigBuilder};
pub use error::{ReaderError, ReaderResult};
pub use reader::TextFileReader;
pub use streaming::{LineSource, ReadSummary, SessionEnd, SourceEnd, StopHandle};
