//! Streaming a file one line at a time
//!
//! This module provides the pull-based [`LineSource`] and the per-session
//! bookkeeping used by the checkpointed reader.

pub mod session;
pub mod source;

pub use session::{ReadSummary, SessionEnd, StopHandle};
pub use source::{LineSource, SourceEnd};
