//! # Quest Primitives
//!
//! Hardcoded runtime constants for the quest engine.
//!
//! The quest starts with zero progress but a fixed shape. These values are
//! compiled into the binary and are immutable at runtime.

/// Number of stages in the quest.
///
/// Stage numbers run `1..=TOTAL_STAGES`. The value `TOTAL_STAGES + 1` is the
/// "all complete" sentinel returned by `next_stage`.
pub const TOTAL_STAGES: u8 = 9;

/// Sentinel returned by `next_stage` once every stage is completed.
pub const ALL_COMPLETE: u8 = TOTAL_STAGES + 1;

/// Default name of the durable storage slot holding the progress blob.
pub const DEFAULT_SLOT_KEY: &str = "nsQuestState";

/// Default delay before a "navigate" event should be applied, in milliseconds.
///
/// Lets completion feedback play before the view changes.
pub const DEFAULT_NAVIGATE_DELAY_MS: u64 = 500;

// =============================================================================
// SNAPSHOT FORMAT
// =============================================================================

/// Magic bytes for the binary snapshot header.
pub const MAGIC_BYTES: &[u8; 4] = b"QUST";

/// Current snapshot format version.
///
/// Increment this when making breaking changes to the snapshot payload.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum snapshot size accepted by the decoder (64 KB).
///
/// A progress record is a few dozen bytes; anything near this size is garbage.
pub const MAX_SNAPSHOT_SIZE: usize = 64 * 1024;

/// Maximum slot blob size accepted by the tolerant loader (64 KB).
pub const MAX_BLOB_SIZE: usize = 64 * 1024;
