//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use quest::api::{
    CommandResponse, EmailRequest, HealthResponse, MapNodeJson, ProgressResponse, status_for,
};
use quest_core::{
    AudioCue, ProgressTracker, QuestError, QuestEvent, StageId, View, journey_map,
};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

// =============================================================================
// PROGRESS RESPONSE TESTS
// =============================================================================

#[test]
fn test_progress_response_from_tracker() {
    let mut tracker = ProgressTracker::new();
    tracker.complete_stage(StageId::FIRST);

    let progress = ProgressResponse::from_tracker(&tracker);

    assert_eq!(progress.completed_stages, vec![1]);
    assert_eq!(progress.next_stage, 2);
    assert_eq!(progress.resume_view, View::Map);
}

#[test]
fn test_progress_response_serialization() {
    let progress = ProgressResponse::from_tracker(&ProgressTracker::new());
    let json = serde_json::to_string(&progress).unwrap();

    assert!(json.contains("\"completed_stages\":[]"));
    assert!(json.contains("\"next_stage\":1"));
    assert!(json.contains("\"resume_view\":\"welcome\""));
    assert!(json.contains("\"user_email\":null"));
}

// =============================================================================
// MAP NODE TESTS
// =============================================================================

#[test]
fn test_map_node_json_fields() {
    let tracker = ProgressTracker::new();
    let nodes: Vec<MapNodeJson> = journey_map(tracker.progress())
        .iter()
        .map(MapNodeJson::from)
        .collect();

    let first = &nodes[0];
    assert_eq!(first.stage, 1);
    assert_eq!(first.title, "Disclaimer");
    assert_eq!(first.acknowledgment, "checkbox");
    assert_eq!(first.label, "Start this stage!");

    let json = serde_json::to_string(first).unwrap();
    assert!(json.contains("\"status\":\"current\""));

    let last = &nodes[8];
    assert_eq!(last.acknowledgment, "email");
    assert_eq!(last.checkbox, None);
    assert_eq!(last.label, "Locked");
}

// =============================================================================
// COMMAND RESPONSE TESTS
// =============================================================================

#[test]
fn test_command_response_events_are_tagged() {
    let tracker = ProgressTracker::new();
    let response = CommandResponse::success(
        vec![
            QuestEvent::Audio {
                cue: AudioCue::StageComplete,
            },
            QuestEvent::Navigate {
                view: View::Stage(StageId::new(3).unwrap()),
                delay_ms: 0,
            },
        ],
        &tracker,
    );

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["events"][0]["event"], "audio");
    assert_eq!(json["events"][0]["cue"], "stage_complete");
    assert_eq!(json["events"][1]["view"]["stage"], 3);
    assert_eq!(json["error"], serde_json::Value::Null);
}

#[test]
fn test_command_response_roundtrip() {
    let tracker = ProgressTracker::new();
    let response = CommandResponse::success(tracker.start(), &tracker);

    let json = serde_json::to_string(&response).unwrap();
    let parsed: CommandResponse = serde_json::from_str(&json).unwrap();

    assert!(parsed.success);
    assert_eq!(parsed.events, response.events);
    assert_eq!(parsed.progress, response.progress);
}

#[test]
fn test_command_response_error() {
    let response = CommandResponse::from_error(&QuestError::InvalidEmail);

    assert!(!response.success);
    assert!(response.events.is_empty());
    assert!(response.progress.is_none());
    assert_eq!(response.error.as_deref(), Some("Invalid email address"));
}

// =============================================================================
// REQUEST TESTS
// =============================================================================

#[test]
fn test_email_request_deserialization() {
    let request: EmailRequest = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
    assert_eq!(request.email, "a@b.co");

    assert!(serde_json::from_str::<EmailRequest>("{}").is_err());
}

// =============================================================================
// ERROR MAPPING TESTS
// =============================================================================

#[test]
fn test_status_for_errors() {
    assert_eq!(
        status_for(&QuestError::InvalidEmail),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        status_for(&QuestError::StageLocked(StageId::FINAL)),
        StatusCode::CONFLICT
    );
    assert_eq!(
        status_for(&QuestError::StageOutOfRange(0)),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_for(&QuestError::IoError("disk".to_string())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
