//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use quest_core::{
    Acknowledgment, MapNode, NodeStatus, ProgressTracker, QuestError, QuestEvent, View,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// PROGRESS RESPONSE
// =============================================================================

/// Snapshot of the tracker state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub completed_stages: Vec<u8>,
    pub next_stage: u8,
    /// Every stage is completed.
    pub complete: bool,
    pub user_email: Option<String>,
    pub video_watched: bool,
    pub sound_enabled: bool,
    /// View a returning user should land on.
    pub resume_view: View,
}

impl ProgressResponse {
    pub fn from_tracker(tracker: &ProgressTracker) -> Self {
        let progress = tracker.progress();
        Self {
            completed_stages: progress.completed_stages.iter().map(|s| s.get()).collect(),
            next_stage: tracker.next_stage(),
            complete: tracker.is_complete(),
            user_email: progress.user_email.clone(),
            video_watched: progress.video_watched,
            sound_enabled: progress.sound_enabled,
            resume_view: tracker.resume_view(),
        }
    }
}

// =============================================================================
// MAP RESPONSE
// =============================================================================

/// One journey map node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapNodeJson {
    pub stage: u8,
    pub title: String,
    pub status: NodeStatus,
    /// Human-readable status text.
    pub label: String,
    pub has_link: bool,
    /// "checkbox" or "email".
    pub acknowledgment: String,
    /// Form field name of the checkbox, for checkbox stages.
    pub checkbox: Option<String>,
}

impl From<&MapNode> for MapNodeJson {
    fn from(node: &MapNode) -> Self {
        let definition = node.definition;
        let (acknowledgment, checkbox) = match definition.acknowledgment {
            Acknowledgment::Checkbox(field) => ("checkbox", Some(field.to_string())),
            Acknowledgment::Email => ("email", None),
        };
        Self {
            stage: definition.stage.get(),
            title: definition.title.to_string(),
            status: node.status,
            label: node.status.label().to_string(),
            has_link: definition.has_link,
            acknowledgment: acknowledgment.to_string(),
            checkbox,
        }
    }
}

/// Journey map response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapResponse {
    pub nodes: Vec<MapNodeJson>,
    pub next_stage: u8,
}

impl MapResponse {
    pub fn from_tracker(tracker: &ProgressTracker) -> Self {
        Self {
            nodes: tracker.journey_map().iter().map(MapNodeJson::from).collect(),
            next_stage: tracker.next_stage(),
        }
    }
}

// =============================================================================
// COMMAND RESPONSE
// =============================================================================

/// Result of a tracker command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    /// Events to act on, in order.
    pub events: Vec<QuestEvent>,
    /// State after the command.
    pub progress: Option<ProgressResponse>,
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn success(events: Vec<QuestEvent>, tracker: &ProgressTracker) -> Self {
        Self {
            success: true,
            events,
            progress: Some(ProgressResponse::from_tracker(tracker)),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            events: Vec::new(),
            progress: None,
            error: Some(msg.into()),
        }
    }

    /// Build from a core error.
    pub fn from_error(error: &QuestError) -> Self {
        Self::error(error.to_string())
    }
}

// =============================================================================
// EMAIL REQUEST
// =============================================================================

/// Final-stage email submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

// =============================================================================
// SOUND RESPONSE
// =============================================================================

/// Sound preference after a toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundResponse {
    pub sound_enabled: bool,
    pub events: Vec<QuestEvent>,
}
