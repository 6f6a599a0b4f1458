//! # quest-core
//!
//! The onboarding quest engine: a nine-stage progression state machine with
//! persistence, plus the confetti renderer used for celebrations.
//!
//! ## Layout
//!
//! - `types`: stage numbers, views, events and the error type
//! - `progress`: the persisted progress record
//! - `tracker`: the state machine that owns and persists the progress
//! - `system`: the stage catalog, celebration rule table and journey map
//! - `formats`: slot blob (JSON) and snapshot (binary) encodings
//! - `storage`: slot backends (memory, file, redb)
//! - `celebration`: particle batches and a software canvas
//!
//! ## Constraints
//!
//! - Synchronous and single-threaded; callers serialize access
//! - No async, no network dependencies
//! - Side effects (view switches, sounds) are returned as [`QuestEvent`]s,
//!   never performed here

// =============================================================================
// MODULES
// =============================================================================

pub mod celebration;
pub mod formats;
pub mod primitives;
pub mod progress;
pub mod storage;
pub mod system;
pub mod tracker;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{AudioCue, QuestError, QuestEvent, StageId, View};

// =============================================================================
// RE-EXPORTS: State Machine
// =============================================================================

pub use progress::QuestProgress;
pub use tracker::{ProgressTracker, TrackerOptions, validate_email};

// =============================================================================
// RE-EXPORTS: Storage and Formats
// =============================================================================

pub use formats::{
    SnapshotHeader, progress_from_blob, progress_from_snapshot, progress_to_blob,
    progress_to_snapshot,
};
pub use storage::{FileSlot, MemorySlot, RedbSlot, SlotBackend, SlotStore};

// =============================================================================
// RE-EXPORTS: System (from system module)
// =============================================================================

pub use system::{
    Acknowledgment, MapNode, NodeStatus, STAGES, StageDefinition, celebrates, journey_map,
};

// =============================================================================
// RE-EXPORTS: Celebration
// =============================================================================

pub use celebration::{
    Canvas, CelebrationRenderer, FRAME_BUDGET, MAX_CANVAS_SIDE, PALETTE, PARTICLE_COUNT, Particle,
    ParticleBatch, ParticleRect, RenderSurface, Rgb,
};
