//! # Quest Progress
//!
//! The sole persisted entity: which stages are complete plus a few auxiliary
//! preferences.
//!
//! ## Invariants
//!
//! - `completed_stages` only ever holds valid `StageId`s, each at most once
//!   (`BTreeSet<StageId>` enforces both).
//! - `next_stage` is the smallest stage not yet completed, or
//!   [`ALL_COMPLETE`] when every stage is done.
//! - A stage is locked iff it lies strictly after `next_stage`; completed
//!   stages stay reviewable.

use crate::primitives::{ALL_COMPLETE, TOTAL_STAGES};
use crate::StageId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Completion record and preferences of a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    /// Completed stages. Uses BTreeSet for deterministic ordering.
    pub completed_stages: BTreeSet<StageId>,
    /// Email submitted with the final stage.
    pub user_email: Option<String>,
    /// Whether the introductory video was acknowledged.
    pub video_watched: bool,
    /// Audio cue preference. Survives resets.
    pub sound_enabled: bool,
}

impl Default for QuestProgress {
    fn default() -> Self {
        Self {
            completed_stages: BTreeSet::new(),
            user_email: None,
            video_watched: false,
            sound_enabled: true,
        }
    }
}

impl QuestProgress {
    /// Create a fresh, empty progress record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Smallest stage number not yet completed, or `ALL_COMPLETE`.
    #[must_use]
    pub fn next_stage(&self) -> u8 {
        StageId::all()
            .find(|stage| !self.completed_stages.contains(stage))
            .map_or(ALL_COMPLETE, StageId::get)
    }

    /// Check if a stage is locked (strictly after the next stage).
    #[must_use]
    pub fn is_locked(&self, stage: StageId) -> bool {
        stage.get() > self.next_stage()
    }

    /// Check if a stage may be interacted with: the current stage, any earlier
    /// stage, or any completed stage (review).
    #[must_use]
    pub fn can_open(&self, stage: StageId) -> bool {
        !self.is_locked(stage) || self.is_completed(stage)
    }

    /// Check if a stage has been completed.
    #[must_use]
    pub fn is_completed(&self, stage: StageId) -> bool {
        self.completed_stages.contains(&stage)
    }

    /// Check if every stage has been completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_stages.len() == usize::from(TOTAL_STAGES)
    }

    /// Record a stage as completed. Returns `false` if it already was.
    pub fn mark_completed(&mut self, stage: StageId) -> bool {
        self.completed_stages.insert(stage)
    }

    /// Check if the user has started the journey (map should be shown on resume).
    #[must_use]
    pub fn has_started(&self) -> bool {
        !self.completed_stages.is_empty() || self.video_watched
    }

    /// Clear all progress fields. The sound preference is kept.
    pub fn clear(&mut self) {
        self.completed_stages.clear();
        self.user_email = None;
        self.video_watched = false;
    }
}

// =============================================================================
// TESTS
// =============================================================================
