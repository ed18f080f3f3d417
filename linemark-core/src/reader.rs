//! Resumable line-by-line file reader
//!
//! [`TextFileReader`] streams a file line by line, hands each line to an
//! async handler and records how many lines were handled. The record is
//! saved every `save_every` lines and whenever a read session ends, so a
//! later session picks up at the first unhandled line.
//!
//! Handlers run strictly one after another: the next line is not pulled
//! from the file until the handler for the previous one has completed.
//!
//! When the final save of a session fails, the reader keeps the unsaved
//! progress in memory and resumes from it, so a retry on the same reader
//! does not deliver those lines again.

use crate::checkpoint::{CheckpointRecord, CheckpointStore, JsonFileStore};
use crate::config::ReaderConfig;
use crate::error::{ReaderError, ReaderResult};
use crate::streaming::session::{Session, SessionFlags, SessionGuard};
use crate::streaming::{LineSource, ReadSummary, SourceEnd, StopHandle};
use std::convert::Infallible;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// The file a reader was opened on and the location of its checkpoint
#[derive(Debug, Clone)]
struct SourceHandle {
    path: PathBuf,
    checkpoint: PathBuf,
}

/// Reads a text file line by line and remembers where it stopped
///
/// # Example
///
/// ```rust,no_run
/// use linemark_core::TextFileReader;
///
/// # async fn run() -> Result<(), linemark_core::ReaderError> {
/// let mut reader = TextFileReader::new();
/// reader.open("data/input.txt")?;
///
/// let reader = &reader;
/// let summary = reader
///     .read(|line, number| async move {
///         println!("{number}: {line}");
///         if number == 100 {
///             reader.stop();
///         }
///     })
///     .await?;
///
/// println!("checkpoint is now at {}", summary.checkpoint);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TextFileReader<S = JsonFileStore> {
    config: ReaderConfig,
    store: S,
    source: Option<SourceHandle>,
    flags: Arc<SessionFlags>,
    /// Progress of the last session whose final save failed
    unsaved: Mutex<Option<CheckpointRecord>>,
}

impl TextFileReader<JsonFileStore> {
    /// Create a reader with the default configuration
    pub fn new() -> Self {
        let config = ReaderConfig::default();
        let store = JsonFileStore::new(config.checkpoint_suffix.clone());
        Self::from_parts(config, store)
    }

    /// Create a reader that keeps JSON checkpoints next to the source file
    pub fn with_config(config: ReaderConfig) -> ReaderResult<Self> {
        let store = JsonFileStore::new(config.checkpoint_suffix.clone());
        Self::with_store(config, store)
    }
}

impl Default for TextFileReader<JsonFileStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CheckpointStore> TextFileReader<S> {
    /// Create a reader that persists checkpoints through `store`
    ///
    /// The store decides where checkpoints live, so
    /// `config.checkpoint_suffix` only applies to readers built with
    /// [`with_config`](TextFileReader::with_config).
    pub fn with_store(config: ReaderConfig, store: S) -> ReaderResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, store))
    }

    fn from_parts(config: ReaderConfig, store: S) -> Self {
        Self {
            config,
            store,
            source: None,
            flags: Arc::new(SessionFlags::default()),
            unsaved: Mutex::new(None),
        }
    }

    /// The reader's configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// The store checkpoints are persisted through
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open the file to read
    ///
    /// A reader can be opened once. The path must name an existing,
    /// readable file.
    pub fn open(&mut self, path: impl AsRef<Path>) -> ReaderResult<()> {
        if let Some(handle) = &self.source {
            return Err(ReaderError::AlreadyOpen {
                path: handle.path.clone(),
            });
        }

        let path = path.as_ref();
        let not_found = |source: Option<std::io::Error>| ReaderError::NotFound {
            path: path.to_path_buf(),
            source,
        };
        let metadata = std::fs::metadata(path).map_err(|e| not_found(Some(e)))?;
        if !metadata.is_file() {
            return Err(not_found(None));
        }
        std::fs::File::open(path).map_err(|e| not_found(Some(e)))?;

        let checkpoint = self.store.locate(path)?;

        info!(
            path = %path.display(),
            checkpoint = %checkpoint.display(),
            "opened file"
        );
        self.source = Some(SourceHandle {
            path: path.to_path_buf(),
            checkpoint,
        });
        Ok(())
    }

    fn handle(&self) -> ReaderResult<&SourceHandle> {
        self.source.as_ref().ok_or(ReaderError::NotOpened)
    }

    /// Path of the opened file
    pub fn path(&self) -> ReaderResult<&Path> {
        Ok(&self.handle()?.path)
    }

    /// Location of the opened file's checkpoint
    pub fn checkpoint_path(&self) -> ReaderResult<&Path> {
        Ok(&self.handle()?.checkpoint)
    }

    /// The checkpoint the next session resumes from
    ///
    /// This is the stored record, unless the last session could not save
    /// its progress, in which case that progress is returned.
    pub fn checkpoint(&self) -> ReaderResult<CheckpointRecord> {
        let handle = self.handle()?;
        match self.unsaved_checkpoint() {
            Some(record) => Ok(record),
            None => self.store.load(&handle.checkpoint),
        }
    }

    /// Progress the last session reached but could not save
    pub fn unsaved_checkpoint(&self) -> Option<CheckpointRecord> {
        *self.unsaved.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_unsaved(&self, record: Option<CheckpointRecord>) {
        *self.unsaved.lock().unwrap_or_else(PoisonError::into_inner) = record;
    }

    /// Whether a read session is active
    pub fn is_reading(&self) -> bool {
        self.flags.is_reading()
    }

    /// A handle that can stop sessions of this reader from elsewhere
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(Arc::clone(&self.flags))
    }

    /// Stop the active session after the line being handled
    ///
    /// Safe to call from inside the line handler. Does nothing when no
    /// session is active.
    pub fn stop(&self) {
        self.stop_handle().stop();
    }

    /// Reset the checkpoint so the next session starts at the first line
    pub fn reset_checkpoint(&self) -> ReaderResult<()> {
        let handle = self.handle()?;
        if self.is_reading() {
            return Err(ReaderError::ReadInProgress);
        }

        self.store
            .save(&handle.checkpoint, &CheckpointRecord::default())?;
        self.set_unsaved(None);
        info!(checkpoint = %handle.checkpoint.display(), "checkpoint reset");
        Ok(())
    }

    /// Count the lines of the opened file
    ///
    /// Independent of the checkpoint, which is neither read nor written.
    pub async fn count_lines(&self) -> ReaderResult<u64> {
        let handle = self.handle()?;
        let read_error = |source: std::io::Error| ReaderError::Read {
            path: handle.path.clone(),
            source,
        };

        let source = LineSource::open(&handle.path, self.config.buffer_capacity)
            .await
            .map_err(read_error)?;
        source.count().await.map_err(read_error)
    }

    /// Read the file from the checkpoint onwards
    ///
    /// `handler` receives each line and its one-based line number. Lines
    /// before the checkpoint are skipped without calling it. The session
    /// ends at end of file, on a read failure or after [`stop`](Self::stop);
    /// in every case the checkpoint is saved before this returns.
    ///
    /// A failed checkpoint save does not interrupt the session. Once it
    /// ends, [`ReaderError::Unsaved`] is returned with the summary. A read
    /// failure takes precedence.
    pub async fn read<F, Fut>(&self, mut handler: F) -> ReaderResult<ReadSummary>
    where
        F: FnMut(String, u64) -> Fut,
        Fut: Future<Output = ()>,
    {
        self.try_read(|line, number| {
            let handled = handler(line, number);
            async move {
                handled.await;
                Ok::<(), Infallible>(())
            }
        })
        .await
    }

    /// Like [`read`](Self::read), with a handler that can fail
    ///
    /// A line whose handler returns an error is not counted as processed:
    /// the session ends, the checkpoint is saved at the line before it and
    /// [`ReaderError::Handler`] is returned. The next session delivers the
    /// failed line again.
    pub async fn try_read<F, Fut, E>(&self, mut handler: F) -> ReaderResult<ReadSummary>
    where
        F: FnMut(String, u64) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let handle = self.handle()?;
        let guard = SessionGuard::acquire(&self.flags)?;

        let record = match self.unsaved_checkpoint() {
            Some(record) => {
                warn!(line = record.line, "resuming from progress that was not saved");
                record
            }
            None => self.store.load(&handle.checkpoint)?,
        };
        let mut session = Session::new(record, self.config.save_every);
        info!(
            path = %handle.path.display(),
            resume_from = session.resume_target(),
            "read session started"
        );

        let mut lines = match LineSource::open(&handle.path, self.config.buffer_capacity).await {
            Ok(lines) => lines,
            Err(source) => {
                self.finish_session(handle, &mut session);
                return Err(ReaderError::Read {
                    path: handle.path.clone(),
                    source,
                });
            }
        };

        let failure = loop {
            if guard.stop_requested() {
                lines.end();
            }

            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break None,
                Err(source) => {
                    break Some(ReaderError::Read {
                        path: handle.path.clone(),
                        source,
                    })
                }
            };

            if session.should_skip() {
                session.skip();
                continue;
            }

            let number = session.line_number();
            if let Err(e) = handler(line, number).await {
                break Some(ReaderError::Handler {
                    line: number,
                    checkpoint: session.record(),
                    source: e.into(),
                });
            }

            if session.complete_line() {
                debug!(line = session.record().line, "cadence checkpoint");
                self.persist(handle, &mut session);
            }
        };

        let end = if failure.is_some() {
            SourceEnd::Failed
        } else {
            lines.finish()
        };
        self.finish_session(handle, &mut session);
        drop(guard);

        if let Some(err) = failure {
            if session.has_deferred_error() {
                warn!("checkpoint save also failed during the session");
            }
            warn!(
                path = %handle.path.display(),
                line = session.record().line,
                error = %err,
                "read session failed"
            );
            return Err(err);
        }

        let outcome = session.into_outcome(end);
        match &outcome {
            Ok(summary) => info!(
                delivered = summary.delivered,
                skipped = summary.skipped,
                line = summary.checkpoint.line,
                end = ?summary.end,
                "read session ended"
            ),
            Err(err) => warn!(error = %err, "read session ended with unsaved progress"),
        }
        outcome
    }

    /// Final save of a session, remembering the progress if it fails
    fn finish_session(&self, handle: &SourceHandle, session: &mut Session) {
        let saved = self.persist(handle, session);
        self.set_unsaved(if saved { None } else { Some(session.record()) });
    }

    /// Save the session's record, deferring a failure to the session outcome
    fn persist(&self, handle: &SourceHandle, session: &mut Session) -> bool {
        let record = session.record();
        match self.store.save(&handle.checkpoint, &record) {
            Ok(()) => true,
            Err(err) => {
                warn!(line = record.line, error = %err, "checkpoint save failed");
                session.defer_error(err);
                false
            }
        }
    }
}
