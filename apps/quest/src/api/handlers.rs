//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers. Every command
//! handler takes the tracker lock, makes one tracker call, and returns the
//! emitted events together with the resulting progress.

use super::{
    AppState,
    types::{
        CommandResponse, EmailRequest, HealthResponse, MapResponse, ProgressResponse,
        SoundResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use quest_core::{Acknowledgment, QuestError, StageDefinition, StageId};

type CommandResult = (StatusCode, Json<CommandResponse>);

/// HTTP status for a core error.
pub fn status_for(error: &QuestError) -> StatusCode {
    match error {
        QuestError::InvalidEmail => StatusCode::UNPROCESSABLE_ENTITY,
        QuestError::StageLocked(_) => StatusCode::CONFLICT,
        QuestError::StageOutOfRange(_) => StatusCode::BAD_REQUEST,
        QuestError::SerializationError(_) | QuestError::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn rejected(error: &QuestError) -> CommandResult {
    tracing::debug!(error = %error, "command rejected");
    (status_for(error), Json(CommandResponse::from_error(error)))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// QUERY HANDLERS
// =============================================================================

/// Get current progress.
pub async fn progress_handler(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.read().await;
    (StatusCode::OK, Json(ProgressResponse::from_tracker(&tracker)))
}

/// Get the journey map.
pub async fn map_handler(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.read().await;
    (StatusCode::OK, Json(MapResponse::from_tracker(&tracker)))
}

// =============================================================================
// NAVIGATION HANDLERS
// =============================================================================

/// Leave the welcome screen.
pub async fn start_handler(State(state): State<AppState>) -> CommandResult {
    let tracker = state.tracker.read().await;
    let events = tracker.start();
    (
        StatusCode::OK,
        Json(CommandResponse::success(events, &tracker)),
    )
}

/// Acknowledge the introductory video.
pub async fn video_handler(State(state): State<AppState>) -> CommandResult {
    let mut tracker = state.tracker.write().await;
    let events = tracker.acknowledge_video();
    (
        StatusCode::OK,
        Json(CommandResponse::success(events, &tracker)),
    )
}

/// Open a stage screen.
pub async fn open_stage_handler(
    State(state): State<AppState>,
    Path(stage): Path<u8>,
) -> CommandResult {
    let stage = match StageId::new(stage) {
        Ok(stage) => stage,
        Err(e) => return rejected(&e),
    };

    let tracker = state.tracker.read().await;
    match tracker.open_stage(stage) {
        Ok(events) => (
            StatusCode::OK,
            Json(CommandResponse::success(events, &tracker)),
        ),
        Err(e) => rejected(&e),
    }
}

// =============================================================================
// COMPLETION HANDLERS
// =============================================================================

/// Complete a checkbox stage. The email stage goes through `/email`.
pub async fn complete_stage_handler(
    State(state): State<AppState>,
    Path(stage): Path<u8>,
) -> CommandResult {
    let stage = match StageId::new(stage) {
        Ok(stage) => stage,
        Err(e) => return rejected(&e),
    };

    if StageDefinition::of(stage).acknowledgment == Acknowledgment::Email {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(CommandResponse::error(format!(
                "{} is completed by submitting an email to /email",
                stage
            ))),
        );
    }

    let mut tracker = state.tracker.write().await;
    if let Err(e) = tracker.open_stage(stage) {
        return rejected(&e);
    }

    let events = tracker.complete_stage(stage);
    (
        StatusCode::OK,
        Json(CommandResponse::success(events, &tracker)),
    )
}

/// Submit the final-stage email.
pub async fn email_handler(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> CommandResult {
    let mut tracker = state.tracker.write().await;
    if let Err(e) = tracker.open_stage(StageId::FINAL) {
        return rejected(&e);
    }

    match tracker.set_email(&request.email) {
        Ok(events) => (
            StatusCode::OK,
            Json(CommandResponse::success(events, &tracker)),
        ),
        Err(e) => rejected(&e),
    }
}

// =============================================================================
// PREFERENCE HANDLERS
// =============================================================================

/// Toggle sound effects.
pub async fn sound_toggle_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut tracker = state.tracker.write().await;
    let (sound_enabled, events) = tracker.toggle_sound();
    (
        StatusCode::OK,
        Json(SoundResponse {
            sound_enabled,
            events,
        }),
    )
}

/// Clear all progress.
pub async fn reset_handler(State(state): State<AppState>) -> CommandResult {
    let mut tracker = state.tracker.write().await;
    let events = tracker.reset();
    (
        StatusCode::OK,
        Json(CommandResponse::success(events, &tracker)),
    )
}
