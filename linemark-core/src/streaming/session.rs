//! State of a single read session
//!
//! A session tracks the line cursor, the resume target loaded from the
//! checkpoint and the record that gets persisted. Exclusivity and stop
//! requests are shared with [`StopHandle`]s through [`SessionFlags`].

use crate::checkpoint::CheckpointRecord;
use crate::error::{ReaderError, ReaderResult};
use crate::streaming::SourceEnd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How a successful session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Every line of the file was seen
    Exhausted,
    /// The session was stopped before the end of the file
    Stopped,
}

impl From<SourceEnd> for SessionEnd {
    fn from(end: SourceEnd) -> Self {
        match end {
            SourceEnd::Exhausted => SessionEnd::Exhausted,
            SourceEnd::Aborted | SourceEnd::Failed => SessionEnd::Stopped,
        }
    }
}

/// Outcome of a successful read session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadSummary {
    /// Lines handed to the line handler
    pub delivered: u64,
    /// Lines skipped because an earlier session already processed them
    pub skipped: u64,
    /// The record persisted when the session ended
    pub checkpoint: CheckpointRecord,
    /// Why the session ended
    pub end: SessionEnd,
}

/// Flags shared between a reader and its stop handles
#[derive(Debug, Default)]
pub(crate) struct SessionFlags {
    reading: AtomicBool,
    stop_requested: AtomicBool,
}

impl SessionFlags {
    pub(crate) fn is_reading(&self) -> bool {
        self.reading.load(Ordering::Acquire)
    }

    fn request_stop(&self) {
        if self.is_reading() {
            self.stop_requested.store(true, Ordering::Release);
        }
    }
}

/// Requests that the active read session of a reader stops
///
/// Stopping is cooperative: the session finishes the line in progress,
/// persists its checkpoint and then ends. Calling `stop` while no
/// session is active does nothing.
#[derive(Debug, Clone)]
pub struct StopHandle {
    flags: Arc<SessionFlags>,
}

impl StopHandle {
    pub(crate) fn new(flags: Arc<SessionFlags>) -> Self {
        Self { flags }
    }

    /// Ask the active session to stop after the current line
    pub fn stop(&self) {
        self.flags.request_stop();
    }

    /// Whether a session is currently active
    pub fn is_reading(&self) -> bool {
        self.flags.is_reading()
    }
}

/// Marks a reader as reading for as long as it is alive
///
/// Dropping the guard ends the session, including when the `read` future
/// itself is dropped part way through.
#[derive(Debug)]
pub(crate) struct SessionGuard {
    flags: Arc<SessionFlags>,
}

impl SessionGuard {
    pub(crate) fn acquire(flags: &Arc<SessionFlags>) -> ReaderResult<Self> {
        flags
            .reading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ReaderError::AlreadyReading)?;
        flags.stop_requested.store(false, Ordering::Release);

        Ok(Self {
            flags: Arc::clone(flags),
        })
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.flags.stop_requested.load(Ordering::Acquire)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.flags.stop_requested.store(false, Ordering::Release);
        self.flags.reading.store(false, Ordering::Release);
    }
}

/// Cursor and checkpoint bookkeeping for one read session
#[derive(Debug)]
pub(crate) struct Session {
    /// Zero-based index of the next line from the source
    cursor: u64,
    /// Lines below this index were processed by an earlier session
    resume_target: u64,
    record: CheckpointRecord,
    save_every: u64,
    delivered: u64,
    skipped: u64,
    /// First checkpoint write failure, reported when the session ends
    deferred: Option<ReaderError>,
}

impl Session {
    pub(crate) fn new(record: CheckpointRecord, save_every: u64) -> Self {
        Self {
            cursor: 0,
            resume_target: record.line,
            record,
            save_every: save_every.max(1),
            delivered: 0,
            skipped: 0,
            deferred: None,
        }
    }

    pub(crate) fn resume_target(&self) -> u64 {
        self.resume_target
    }

    /// Whether the line at the cursor was already processed
    pub(crate) fn should_skip(&self) -> bool {
        self.cursor < self.resume_target
    }

    /// Count an already processed line without touching the record
    pub(crate) fn skip(&mut self) {
        self.cursor += 1;
        self.skipped += 1;
    }

    /// One-based number of the line at the cursor
    pub(crate) fn line_number(&self) -> u64 {
        self.cursor + 1
    }

    /// Record that the line at the cursor was handled
    ///
    /// Returns `true` when the new cursor falls on a save boundary.
    pub(crate) fn complete_line(&mut self) -> bool {
        self.cursor += 1;
        self.delivered += 1;
        self.record.line = self.cursor;
        self.cursor % self.save_every == 0
    }

    pub(crate) fn record(&self) -> CheckpointRecord {
        self.record
    }

    pub(crate) fn defer_error(&mut self, err: ReaderError) {
        if self.deferred.is_none() {
            self.deferred = Some(err);
        }
    }

    pub(crate) fn has_deferred_error(&self) -> bool {
        self.deferred.is_some()
    }

    /// Turn the finished session into the result of `read`
    ///
    /// A deferred save failure becomes [`ReaderError::Unsaved`], which
    /// still carries the summary.
    pub(crate) fn into_outcome(self, end: SourceEnd) -> ReaderResult<ReadSummary> {
        let summary = ReadSummary {
            delivered: self.delivered,
            skipped: self.skipped,
            checkpoint: self.record,
            end: end.into(),
        };
        match self.deferred {
            Some(err) => Err(ReaderError::Unsaved {
                summary,
                source: Box::new(err),
            }),
            None => Ok(summary),
        }
    }
}
