//! # Stage Catalog
//!
//! The fixed sequence of onboarding stages and the rules attached to them.
//!
//! ## Stage Definitions
//!
//! | Stage | Title | Acknowledgment | External Link |
//! |-------|-------|----------------|---------------|
//! | 1 | Disclaimer | checkbox | no |
//! | 2 | Read the Wiki | checkbox | yes |
//! | 3 | Apply | checkbox | yes |
//! | 4 | Wait for Acceptance | checkbox | no |
//! | 5 | Payment | checkbox | no |
//! | 6 | Onboarding | checkbox | yes |
//! | 7 | Passport Check | checkbox | yes |
//! | 8 | Visa & Travel | checkbox | no |
//! | 9 | Share Your Email | email | no |
//!
//! ## Celebration Rules
//!
//! | Final stage | Parity | Celebrate |
//! |-------------|--------|-----------|
//! | yes | any | yes |
//! | no | even | yes |
//! | no | odd | no |
//!
//! The parity rule is a product decision carried over as-is; confirm with the
//! quest owners before generalizing it.

use crate::{QuestProgress, StageId};
use serde::{Deserialize, Serialize};

// =============================================================================
// ACKNOWLEDGMENT
// =============================================================================

/// How the user acknowledges a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Acknowledgment {
    /// A single checkbox, identified by its form field name.
    Checkbox(&'static str),
    /// An email address submitted through the final form.
    Email,
}

// =============================================================================
// STAGE DEFINITION
// =============================================================================

/// Static description of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageDefinition {
    pub stage: StageId,
    pub title: &'static str,
    pub acknowledgment: Acknowledgment,
    /// The stage screen carries an external link the user should follow.
    pub has_link: bool,
}

const fn define(
    number: u8,
    title: &'static str,
    acknowledgment: Acknowledgment,
    has_link: bool,
) -> StageDefinition {
    StageDefinition {
        stage: StageId::from_const(number),
        title,
        acknowledgment,
        has_link,
    }
}

/// The quest, in order.
pub const STAGES: [StageDefinition; 9] = [
    define(1, "Disclaimer", Acknowledgment::Checkbox("disclaimerCheck"), false),
    define(2, "Read the Wiki", Acknowledgment::Checkbox("wikiCheck"), true),
    define(3, "Apply", Acknowledgment::Checkbox("applyCheck"), true),
    define(4, "Wait for Acceptance", Acknowledgment::Checkbox("waitCheck"), false),
    define(5, "Payment", Acknowledgment::Checkbox("paymentCheck"), false),
    define(6, "Onboarding", Acknowledgment::Checkbox("onboardingCheck"), true),
    define(7, "Passport Check", Acknowledgment::Checkbox("passportCheck"), true),
    define(8, "Visa & Travel", Acknowledgment::Checkbox("visaCheck"), false),
    define(9, "Share Your Email", Acknowledgment::Email, false),
];

impl StageDefinition {
    /// Look up the definition of a stage.
    #[must_use]
    pub fn of(stage: StageId) -> &'static StageDefinition {
        &STAGES[usize::from(stage.get() - 1)]
    }
}

// =============================================================================
// CELEBRATION RULE TABLE
// =============================================================================

/// Decide whether completing `stage` triggers a celebration.
#[must_use]
pub fn celebrates(stage: StageId) -> bool {
    match (stage.is_final(), stage.is_even()) {
        (true, _) => true,
        (false, true) => true,
        (false, false) => false,
    }
}

// =============================================================================
// JOURNEY MAP
// =============================================================================

/// Display status of a stage on the journey map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Completed,
    /// The next stage to complete.
    Current,
    Locked,
}

impl NodeStatus {
    /// Status of `stage` given the current progress. Completion wins over locking.
    #[must_use]
    pub fn of(progress: &QuestProgress, stage: StageId) -> Self {
        if progress.is_completed(stage) {
            NodeStatus::Completed
        } else if stage.get() == progress.next_stage() {
            NodeStatus::Current
        } else {
            NodeStatus::Locked
        }
    }

    /// Short label shown under the map node.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            NodeStatus::Completed => "Complete",
            NodeStatus::Current => "Start this stage!",
            NodeStatus::Locked => "Locked",
        }
    }
}

/// One node of the journey map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapNode {
    pub definition: &'static StageDefinition,
    pub status: NodeStatus,
}

/// Build the journey map for the given progress, in stage order.
#[must_use]
pub fn journey_map(progress: &QuestProgress) -> Vec<MapNode> {
    STAGES
        .iter()
        .map(|definition| MapNode {
            definition,
            status: NodeStatus::of(progress, definition.stage),
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
