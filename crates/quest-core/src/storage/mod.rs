//! # Slot Storage
//!
//! A durable key-value slot holding the serialized progress blob.
//!
//! ## Storage Backends
//!
//! - `Memory`: volatile, for tests and throwaway sessions
//! - `File`: one plain JSON file on disk
//! - `Redb`: a named slot inside a redb database (ACID, crash safe)
//!
//! Every backend overwrites the whole slot on `set`. There is no partial
//! update and no history.

mod redb_slot;

pub use redb_slot::RedbSlot;

use crate::QuestError;
use std::path::{Path, PathBuf};

/// A single named storage slot.
pub trait SlotStore {
    /// Read the slot. `Ok(None)` means nothing was ever stored.
    fn get(&self) -> Result<Option<String>, QuestError>;

    /// Overwrite the slot.
    fn set(&mut self, value: &str) -> Result<(), QuestError>;
}

// =============================================================================
// MEMORY SLOT
// =============================================================================

/// Volatile in-process slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<String>,
}

impl MemorySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds a value.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

impl SlotStore for MemorySlot {
    fn get(&self) -> Result<Option<String>, QuestError> {
        Ok(self.value.clone())
    }

    fn set(&mut self, value: &str) -> Result<(), QuestError> {
        self.value = Some(value.to_string());
        Ok(())
    }
}

// =============================================================================
// FILE SLOT
// =============================================================================

/// A slot backed by a single file. A missing file is an empty slot.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SlotStore for FileSlot {
    fn get(&self) -> Result<Option<String>, QuestError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuestError::IoError(format!(
                "Read slot file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn set(&mut self, value: &str) -> Result<(), QuestError> {
        std::fs::write(&self.path, value).map_err(|e| {
            QuestError::IoError(format!("Write slot file {}: {}", self.path.display(), e))
        })
    }
}

// =============================================================================
// BACKEND SELECTION
// =============================================================================

/// Storage backend for a tracker.
#[derive(Debug)]
pub enum SlotBackend {
    /// In-memory slot (fast, volatile).
    Memory(MemorySlot),
    /// Plain file on disk.
    File(FileSlot),
    /// Named slot in a redb database.
    Redb(RedbSlot),
}

impl Default for SlotBackend {
    fn default() -> Self {
        Self::Memory(MemorySlot::new())
    }
}

impl SlotBackend {
    /// Short backend name, as accepted on the command line.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SlotBackend::Memory(_) => "memory",
            SlotBackend::File(_) => "file",
            SlotBackend::Redb(_) => "redb",
        }
    }

    /// Check if writes survive the process.
    #[must_use]
    pub fn is_durable(&self) -> bool {
        !matches!(self, SlotBackend::Memory(_))
    }
}

impl SlotStore for SlotBackend {
    fn get(&self) -> Result<Option<String>, QuestError> {
        match self {
            SlotBackend::Memory(slot) => slot.get(),
            SlotBackend::File(slot) => slot.get(),
            SlotBackend::Redb(slot) => slot.get(),
        }
    }

    fn set(&mut self, value: &str) -> Result<(), QuestError> {
        match self {
            SlotBackend::Memory(slot) => slot.set(value),
            SlotBackend::File(slot) => slot.set(value),
            SlotBackend::Redb(slot) => slot.set(value),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
