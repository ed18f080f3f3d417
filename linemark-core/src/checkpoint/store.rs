//! Checkpoint persistence
//!
//! A [`CheckpointStore`] maps a source file to the location of its
//! checkpoint and reads or overwrites the record stored there. The
//! default [`JsonFileStore`] keeps a small JSON file next to the source.

use super::CheckpointRecord;
use crate::config::DEFAULT_CHECKPOINT_SUFFIX;
use crate::error::{ReaderError, ReaderResult};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Trait for loading and saving checkpoint records
///
/// Two distinct sources should never map to the same location; stores
/// are not required to detect this.
pub trait CheckpointStore: Send + Sync {
    /// Derive the checkpoint location for a source file
    ///
    /// For stores that write to the filesystem the location must differ
    /// from `source`, otherwise saving would overwrite the file being read.
    fn locate(&self, source: &Path) -> ReaderResult<PathBuf>;

    /// Load the record at `location`
    ///
    /// Returns the default record when nothing has been stored yet and
    /// [`ReaderError::MalformedCheckpoint`] when the stored record cannot
    /// be parsed.
    fn load(&self, location: &Path) -> ReaderResult<CheckpointRecord>;

    /// Overwrite the record at `location`
    ///
    /// Readers of the location never observe a partially written record.
    fn save(&self, location: &Path, record: &CheckpointRecord) -> ReaderResult<()>;
}

/// Stores each checkpoint as a JSON file beside its source
///
/// The final extension of the source path is replaced by the suffix:
/// `data/test.txt` is tracked in `data/test.settings.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    suffix: String,
}

impl JsonFileStore {
    /// Create a store using the given checkpoint suffix
    pub fn new(suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        Self {
            suffix: suffix.trim_matches('.').to_string(),
        }
    }

    /// The suffix replacing the source's final extension
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_CHECKPOINT_SUFFIX)
    }
}

impl CheckpointStore for JsonFileStore {
    fn locate(&self, source: &Path) -> ReaderResult<PathBuf> {
        let location = source.with_extension(&self.suffix);
        if location == source {
            return Err(ReaderError::InvalidConfig {
                reason: format!(
                    "checkpoint suffix {:?} would overwrite the source file {}",
                    self.suffix,
                    source.display()
                ),
            });
        }
        Ok(location)
    }

    fn load(&self, location: &Path) -> ReaderResult<CheckpointRecord> {
        let bytes = match fs::read(location) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(location = %location.display(), "no checkpoint yet, starting at line 0");
                return Ok(CheckpointRecord::default());
            }
            Err(source) => {
                return Err(ReaderError::Persistence {
                    path: location.to_path_buf(),
                    source,
                })
            }
        };

        CheckpointRecord::from_json(&bytes).map_err(|source| ReaderError::MalformedCheckpoint {
            path: location.to_path_buf(),
            source,
        })
    }

    fn save(&self, location: &Path, record: &CheckpointRecord) -> ReaderResult<()> {
        let data = record.to_json().map_err(|e| ReaderError::Persistence {
            path: location.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        write_atomic(location, &data).map_err(|source| ReaderError::Persistence {
            path: location.to_path_buf(),
            source,
        })?;

        debug!(location = %location.display(), line = record.line, "checkpoint saved");
        Ok(())
    }
}

/// Write to a sibling temp file, fsync, then rename over the target
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("checkpoint");
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let result = (|| {
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        // Leftover temp files are harmless but noisy
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Keeps checkpoints in memory, keyed by source path
///
/// Nothing is written to disk, so the location of a checkpoint is the
/// source path itself. Useful in tests and for embedders that track progress elsewhere.
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    records: Mutex<HashMap<PathBuf, CheckpointRecord>>,
}

impl MemoryCheckpointStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored record for a location, if any
    pub fn get(&self, location: &Path) -> Option<CheckpointRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(location)
            .copied()
    }

    /// Seed a record without going through a read session
    pub fn insert(&self, location: impl Into<PathBuf>, record: CheckpointRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(location.into(), record);
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn locate(&self, source: &Path) -> ReaderResult<PathBuf> {
        Ok(source.to_path_buf())
    }

    fn load(&self, location: &Path) -> ReaderResult<CheckpointRecord> {
        Ok(self.get(location).unwrap_or_default())
    }

    fn save(&self, location: &Path, record: &CheckpointRecord) -> ReaderResult<()> {
        self.insert(location, *record);
        Ok(())
    }
}

impl<S: CheckpointStore + ?Sized> CheckpointStore for std::sync::Arc<S> {
    fn locate(&self, source: &Path) -> ReaderResult<PathBuf> {
        (**self).locate(source)
    }

    fn load(&self, location: &Path) -> ReaderResult<CheckpointRecord> {
        (**self).load(location)
    }

    fn save(&self, location: &Path, record: &CheckpointRecord) -> ReaderResult<()> {
        (**self).save(location, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_replaces_final_extension() {
        let store = JsonFileStore::default();
        assert_eq!(
            store.locate(Path::new("example/test.txt")).unwrap(),
            PathBuf::from("example/test.settings.json")
        );
        assert_eq!(
            store.locate(Path::new("archive.tar.gz")).unwrap(),
            PathBuf::from("archive.tar.settings.json")
        );
        assert_eq!(
            store.locate(Path::new("data/lines")).unwrap(),
            PathBuf::from("data/lines.settings.json")
        );
    }

    #[test]
    fn test_custom_suffix_strips_dots() {
        let store = JsonFileStore::new(".progress.json");
        assert_eq!(store.suffix(), "progress.json");
        assert_eq!(
            store.locate(Path::new("a.log")).unwrap(),
            PathBuf::from("a.progress.json")
        );
    }

    #[test]
    fn test_locate_rejects_source_itself() {
        let store = JsonFileStore::new("json");
        assert!(matches!(
            store.locate(Path::new("state.json")),
            Err(ReaderError::InvalidConfig { .. })
        ));
        assert!(store.locate(Path::new("state.txt")).is_ok());
    }

    #[test]
    fn test_load_missing_is_default() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::default();
        let location = dir.path().join("input.settings.json");

        let record = store.load(&location).unwrap();
        assert_eq!(record, CheckpointRecord::default());
        assert!(!location.exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::default();
        let location = dir.path().join("input.settings.json");

        store.save(&location, &CheckpointRecord::at(120)).unwrap();
        assert_eq!(fs::read_to_string(&location).unwrap(), r#"{"line":120}"#);

        // Overwrite with a shorter value, no trailing bytes from the old one
        store.save(&location, &CheckpointRecord::at(3)).unwrap();
        assert_eq!(fs::read_to_string(&location).unwrap(), r#"{"line":3}"#);
        assert_eq!(store.load(&location).unwrap(), CheckpointRecord::at(3));

        let temp = dir.path().join(".input.settings.json.tmp");
        assert!(!temp.exists());
    }

    #[test]
    fn test_load_malformed() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::default();
        let location = dir.path().join("input.settings.json");
        fs::write(&location, "{\"line\": ").unwrap();

        let result = store.load(&location);
        assert!(matches!(
            result,
            Err(ReaderError::MalformedCheckpoint { .. })
        ));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::default();
        let location = dir.path().join("missing").join("input.settings.json");

        let result = store.save(&location, &CheckpointRecord::at(1));
        assert!(matches!(result, Err(ReaderError::Persistence { .. })));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCheckpointStore::new();
        let location = store.locate(Path::new("in.txt")).unwrap();
        assert_eq!(location, PathBuf::from("in.txt"));

        assert_eq!(store.load(&location).unwrap(), CheckpointRecord::default());
        store.save(&location, &CheckpointRecord::at(9)).unwrap();
        assert_eq!(store.get(&location), Some(CheckpointRecord::at(9)));
    }
}
