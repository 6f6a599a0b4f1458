//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the quest engine:
//! - Stage identifiers (`StageId`)
//! - Views the front-end can switch between (`View`)
//! - Events emitted by tracker commands (`QuestEvent`, `AudioCue`)
//! - Error types (`QuestError`)
//!
//! ## Validity Guarantees
//!
//! A `StageId` can only be constructed for `1..=TOTAL_STAGES`, so every
//! operation taking one is range-checked by construction. Deserialization goes
//! through the same check.

use crate::primitives::TOTAL_STAGES;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// STAGE IDENTIFIER
// =============================================================================

/// One stage of the quest, numbered `1..=TOTAL_STAGES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StageId(u8);

impl StageId {
    /// The first stage.
    pub const FIRST: StageId = StageId(1);

    /// The final stage (the email submission).
    pub const FINAL: StageId = StageId(TOTAL_STAGES);

    /// Create a stage identifier, rejecting numbers outside `1..=TOTAL_STAGES`.
    pub fn new(number: u8) -> Result<Self, QuestError> {
        if (1..=TOTAL_STAGES).contains(&number) {
            Ok(Self(number))
        } else {
            Err(QuestError::StageOutOfRange(number))
        }
    }

    /// Build a stage in const context. Out-of-range numbers clamp into `1..=TOTAL_STAGES`.
    pub(crate) const fn from_const(number: u8) -> Self {
        if number == 0 {
            Self(1)
        } else if number > TOTAL_STAGES {
            Self(TOTAL_STAGES)
        } else {
            Self(number)
        }
    }

    /// Get the raw stage number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Check if this is the final stage.
    #[must_use]
    pub const fn is_final(self) -> bool {
        self.0 == TOTAL_STAGES
    }

    /// Check if the stage number is even.
    #[must_use]
    pub const fn is_even(self) -> bool {
        self.0 % 2 == 0
    }

    /// Get the following stage, if any.
    #[must_use]
    pub fn next(self) -> Option<StageId> {
        if self.is_final() {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }

    /// Iterate over every stage in order.
    pub fn all() -> impl Iterator<Item = StageId> {
        (1..=TOTAL_STAGES).map(Self)
    }
}

impl TryFrom<u8> for StageId {
    type Error = QuestError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StageId> for u8 {
    fn from(stage: StageId) -> Self {
        stage.0
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage {}", self.0)
    }
}

// =============================================================================
// VIEWS
// =============================================================================

/// A screen of the quest front-end. Exactly one view is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Landing screen shown on a fresh start.
    Welcome,
    /// Introductory video screen.
    Video,
    /// Journey map (overview of all stages).
    Map,
    /// A single stage's acknowledgment screen.
    Stage(StageId),
    /// Terminal screen shown once the final stage is completed.
    Celebration,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Welcome => write!(f, "welcome"),
            View::Video => write!(f, "video"),
            View::Map => write!(f, "map"),
            View::Stage(stage) => write!(f, "stage{}", stage.get()),
            View::Celebration => write!(f, "celebration"),
        }
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Audio cues the front-end may play. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    Click,
    StageComplete,
    Celebration,
}

/// Observable side effects of a tracker command, in emission order.
///
/// The tracker never performs I/O for these; the caller decides how to switch
/// views, play sounds or start the celebration renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QuestEvent {
    /// A stage moved from incomplete to complete.
    StageCompleted { stage: StageId },
    /// The celebration renderer should be triggered.
    Celebrate { stage: StageId },
    /// Switch to `view` after `delay_ms` milliseconds.
    Navigate { view: View, delay_ms: u64 },
    /// Play an audio cue (only emitted while sound is enabled).
    Audio { cue: AudioCue },
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the quest engine.
///
/// - Use `Result<T, QuestError>` for fallible operations
/// - Storage failures during tracker commands are logged, not returned
/// - The core never panics
#[derive(Debug, Error)]
pub enum QuestError {
    /// The submitted email does not have the `local@domain.tld` shape.
    #[error("Invalid email address")]
    InvalidEmail,

    /// A stage number outside `1..=TOTAL_STAGES` was supplied.
    #[error("Stage {0} is out of range (expected 1..={max})", max = TOTAL_STAGES)]
    StageOutOfRange(u8),

    /// The stage cannot be opened until every earlier stage is completed.
    #[error("{0} is locked")]
    StageLocked(StageId),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_id_rejects_out_of_range() {
        assert!(matches!(
            StageId::new(0),
            Err(QuestError::StageOutOfRange(0))
        ));
        assert!(matches!(
            StageId::new(10),
            Err(QuestError::StageOutOfRange(10))
        ));
        assert_eq!(StageId::new(9).expect("valid").get(), 9);
    }

    #[test]
    fn stage_id_ordering_and_next() {
        let all: Vec<u8> = StageId::all().map(StageId::get).collect();
        assert_eq!(all, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(StageId::FIRST.next(), StageId::new(2).ok());
        assert_eq!(StageId::FINAL.next(), None);
    }

    #[test]
    fn stage_id_deserialization_is_validated() {
        let ok: StageId = serde_json::from_str("4").expect("parse");
        assert_eq!(ok.get(), 4);
        assert!(serde_json::from_str::<StageId>("12").is_err());
    }

    #[test]
    fn view_display_matches_screen_ids() {
        assert_eq!(View::Map.to_string(), "map");
        assert_eq!(View::Stage(StageId::FINAL).to_string(), "stage9");
    }

    #[test]
    fn event_serialization_is_tagged() {
        let event = QuestEvent::Navigate {
            view: View::Celebration,
            delay_ms: 500,
        };
        let json = serde_json::to_string(&event).expect("serialize");
        assert_eq!(
            json,
            r#"{"event":"navigate","view":"celebration","delay_ms":500}"#
        );
    }
}
