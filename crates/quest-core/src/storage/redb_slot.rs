//! # redb-backed Slot
//!
//! A durable slot stored in a redb embedded database, providing:
//! - ACID writes (a slot is never half-written)
//! - Crash safety (copy-on-write B-trees)
//! - Several named slots in one file, if needed
//!
//! Layout: a single `slots` table mapping slot name to blob text.

use super::SlotStore;
use crate::QuestError;
use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;

/// Table for slots: slot name -> serialized blob
const SLOTS: TableDefinition<&str, &str> = TableDefinition::new("slots");

/// A named slot inside a redb database.
pub struct RedbSlot {
    /// The redb database handle.
    db: Database,
    /// Name of the slot this handle reads and writes.
    key: String,
}

impl std::fmt::Debug for RedbSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbSlot")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl RedbSlot {
    /// Open or create a database at `path` and bind to the slot named `key`.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self, QuestError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| QuestError::IoError(e.to_string()))?;

        // Create the table up front so readers never see a missing table.
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| QuestError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(SLOTS)
                .map_err(|e| QuestError::IoError(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| QuestError::IoError(e.to_string()))?;
        }

        Ok(Self {
            db,
            key: key.into(),
        })
    }

    /// Name of the bound slot.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl SlotStore for RedbSlot {
    fn get(&self) -> Result<Option<String>, QuestError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| QuestError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(SLOTS)
            .map_err(|e| QuestError::IoError(e.to_string()))?;
        let value = table
            .get(self.key.as_str())
            .map_err(|e| QuestError::IoError(e.to_string()))?
            .map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn set(&mut self, value: &str) -> Result<(), QuestError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| QuestError::IoError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SLOTS)
                .map_err(|e| QuestError::IoError(e.to_string()))?;
            table
                .insert(self.key.as_str(), value)
                .map_err(|e| QuestError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| QuestError::IoError(e.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
