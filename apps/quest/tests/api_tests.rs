//! Integration tests for the quest HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use axum_test::TestServer;
use quest::api::{
    AppState, CommandResponse, EmailRequest, HealthResponse, MapResponse, ProgressResponse,
    SoundResponse, create_router,
};
use quest_core::{
    AudioCue, FileSlot, NodeStatus, ProgressTracker, QuestEvent, SlotBackend, StageId, View,
};
use serde_json::json;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a test server with a fresh in-memory tracker.
fn create_test_server() -> TestServer {
    let state = AppState::new(ProgressTracker::new());
    TestServer::new(create_router(state)).unwrap()
}

/// Create a test server whose first `completed` stages are done.
fn create_progressed_test_server(completed: u8) -> TestServer {
    let mut tracker = ProgressTracker::new();
    for n in 1..=completed {
        tracker.complete_stage(StageId::new(n).unwrap());
    }
    TestServer::new(create_router(AppState::new(tracker))).unwrap()
}

async fn progress_of(server: &TestServer) -> ProgressResponse {
    server.get("/progress").await.json()
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// PROGRESS AND MAP TESTS
// =============================================================================

#[tokio::test]
async fn test_progress_fresh_state() {
    let server = create_test_server();

    let progress = progress_of(&server).await;

    assert!(progress.completed_stages.is_empty());
    assert_eq!(progress.next_stage, 1);
    assert!(!progress.complete);
    assert_eq!(progress.user_email, None);
    assert!(progress.sound_enabled);
    assert_eq!(progress.resume_view, View::Welcome);
}

#[tokio::test]
async fn test_map_reflects_progress() {
    let server = create_progressed_test_server(2);

    let response = server.get("/map").await;

    response.assert_status_ok();
    let map: MapResponse = response.json();
    assert_eq!(map.nodes.len(), 9);
    assert_eq!(map.next_stage, 3);
    assert_eq!(map.nodes[0].status, NodeStatus::Completed);
    assert_eq!(map.nodes[2].status, NodeStatus::Current);
    assert_eq!(map.nodes[3].status, NodeStatus::Locked);
    assert_eq!(map.nodes[0].checkbox.as_deref(), Some("disclaimerCheck"));
    assert_eq!(map.nodes[8].acknowledgment, "email");
    assert!(map.nodes[1].has_link);
}

// =============================================================================
// NAVIGATION TESTS
// =============================================================================

#[tokio::test]
async fn test_start_navigates_to_video() {
    let server = create_test_server();

    let response = server.post("/start").await;

    response.assert_status_ok();
    let result: CommandResponse = response.json();
    assert!(result.success);
    assert_eq!(
        result.events.last(),
        Some(&QuestEvent::Navigate {
            view: View::Video,
            delay_ms: 0
        })
    );
}

#[tokio::test]
async fn test_video_marks_watched() {
    let server = create_test_server();

    server.post("/video").await.assert_status_ok();

    let progress = progress_of(&server).await;
    assert!(progress.video_watched);
    assert_eq!(progress.resume_view, View::Map);
}

#[tokio::test]
async fn test_open_current_stage() {
    let server = create_test_server();

    let response = server.post("/stages/1/open").await;

    response.assert_status_ok();
    let result: CommandResponse = response.json();
    assert!(result.events.contains(&QuestEvent::Navigate {
        view: View::Stage(StageId::FIRST),
        delay_ms: 0
    }));
}

#[tokio::test]
async fn test_open_locked_stage_conflicts() {
    let server = create_test_server();

    let response = server.post("/stages/3/open").await;

    response.assert_status(StatusCode::CONFLICT);
    let result: CommandResponse = response.json();
    assert!(!result.success);
    assert!(result.error.unwrap().contains("locked"));
}

#[tokio::test]
async fn test_open_completed_stage_for_review() {
    let server = create_progressed_test_server(3);

    server.post("/stages/2/open").await.assert_status_ok();
}

#[tokio::test]
async fn test_out_of_range_stage_is_bad_request() {
    let server = create_test_server();

    server
        .post("/stages/0/open")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .post("/stages/10/complete")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// COMPLETION TESTS
// =============================================================================

#[tokio::test]
async fn test_complete_stage_events() {
    let server = create_test_server();

    let response = server.post("/stages/1/complete").await;

    response.assert_status_ok();
    let result: CommandResponse = response.json();
    assert_eq!(
        result.events,
        vec![
            QuestEvent::StageCompleted {
                stage: StageId::FIRST
            },
            QuestEvent::Audio {
                cue: AudioCue::StageComplete
            },
            QuestEvent::Navigate {
                view: View::Map,
                delay_ms: 500
            },
        ]
    );
    assert_eq!(result.progress.unwrap().next_stage, 2);
}

#[tokio::test]
async fn test_complete_even_stage_celebrates() {
    let server = create_progressed_test_server(1);

    let result: CommandResponse = server.post("/stages/2/complete").await.json();

    assert!(
        result
            .events
            .iter()
            .any(|e| matches!(e, QuestEvent::Celebrate { .. }))
    );
}

#[tokio::test]
async fn test_complete_twice_emits_nothing() {
    let server = create_test_server();

    server.post("/stages/1/complete").await.assert_status_ok();
    let response = server.post("/stages/1/complete").await;

    response.assert_status_ok();
    let result: CommandResponse = response.json();
    assert!(result.events.is_empty());
}

#[tokio::test]
async fn test_complete_locked_stage_conflicts() {
    let server = create_test_server();

    server
        .post("/stages/4/complete")
        .await
        .assert_status(StatusCode::CONFLICT);
    assert!(progress_of(&server).await.completed_stages.is_empty());
}

#[tokio::test]
async fn test_email_stage_requires_email_endpoint() {
    let server = create_progressed_test_server(8);

    server
        .post("/stages/9/complete")
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(progress_of(&server).await.next_stage, 9);
}

// =============================================================================
// EMAIL TESTS
// =============================================================================

#[tokio::test]
async fn test_invalid_email_is_unprocessable() {
    let server = create_progressed_test_server(8);

    let response = server
        .post("/email")
        .json(&EmailRequest {
            email: "not-an-email".to_string(),
        })
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let progress = progress_of(&server).await;
    assert_eq!(progress.completed_stages, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(progress.user_email, None);
}

#[tokio::test]
async fn test_valid_email_completes_quest() {
    let server = create_progressed_test_server(8);

    let response = server
        .post("/email")
        .json(&json!({ "email": "  user@example.com " }))
        .await;

    response.assert_status_ok();
    let result: CommandResponse = response.json();
    assert!(result.events.contains(&QuestEvent::Navigate {
        view: View::Celebration,
        delay_ms: 500
    }));
    assert!(result.events.contains(&QuestEvent::Audio {
        cue: AudioCue::Celebration
    }));

    let progress = result.progress.unwrap();
    assert_eq!(progress.user_email.as_deref(), Some("user@example.com"));
    assert_eq!(progress.next_stage, 10);
    assert!(progress.complete);
}

#[tokio::test]
async fn test_email_before_final_stage_conflicts() {
    let server = create_progressed_test_server(2);

    server
        .post("/email")
        .json(&json!({ "email": "user@example.com" }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

// =============================================================================
// PREFERENCE TESTS
// =============================================================================

#[tokio::test]
async fn test_sound_toggle_silences_cues() {
    let server = create_test_server();

    let off: SoundResponse = server.post("/sound/toggle").await.json();
    assert!(!off.sound_enabled);
    assert!(off.events.is_empty());

    let result: CommandResponse = server.post("/stages/1/complete").await.json();
    assert!(
        !result
            .events
            .iter()
            .any(|e| matches!(e, QuestEvent::Audio { .. }))
    );

    let on: SoundResponse = server.post("/sound/toggle").await.json();
    assert!(on.sound_enabled);
    assert_eq!(
        on.events,
        vec![QuestEvent::Audio {
            cue: AudioCue::Click
        }]
    );
}

#[tokio::test]
async fn test_reset_keeps_sound_preference() {
    let server = create_progressed_test_server(5);
    server.post("/sound/toggle").await.assert_status_ok();

    let result: CommandResponse = server.post("/reset").await.json();

    assert_eq!(
        result.events,
        vec![QuestEvent::Navigate {
            view: View::Welcome,
            delay_ms: 0
        }]
    );
    let progress = result.progress.unwrap();
    assert!(progress.completed_stages.is_empty());
    assert_eq!(progress.next_stage, 1);
    assert!(!progress.sound_enabled);
}

// =============================================================================
// PERSISTENCE TESTS
// =============================================================================

#[tokio::test]
async fn test_commands_persist_to_backend() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("quest.json");

    {
        let tracker = ProgressTracker::open(SlotBackend::File(FileSlot::new(&path)));
        let server = TestServer::new(create_router(AppState::new(tracker))).unwrap();
        server.post("/stages/1/complete").await.assert_status_ok();
        server.post("/stages/2/complete").await.assert_status_ok();
    }

    let tracker = ProgressTracker::open(SlotBackend::File(FileSlot::new(&path)));
    assert_eq!(tracker.next_stage(), 3);
}
