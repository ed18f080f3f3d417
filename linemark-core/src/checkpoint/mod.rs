//! Durable resume state
//!
//! One [`CheckpointRecord`] per source file, persisted through a
//! [`CheckpointStore`].

pub mod record;
pub mod store;

pub use record::CheckpointRecord;
pub use store::{CheckpointStore, JsonFileStore, MemoryCheckpointStore};
