//! # Formats
//!
//! Pure encode/decode functions for persisted progress. File and database I/O
//! live in [`crate::storage`].

pub mod blob;
pub mod persistence;

pub use blob::{progress_from_blob, progress_to_blob};
pub use persistence::{SnapshotHeader, progress_from_snapshot, progress_to_snapshot};
