//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands. Commands
//! call the tracker and then act on the events it returns.

use super::terminal;
use crate::api;
use crate::config::{CelebrationConfig, QuestConfig};
use quest_core::{
    Acknowledgment, AudioCue, Canvas, NodeStatus, ProgressTracker, QuestError, QuestEvent,
    QuestProgress, StageDefinition, StageId,
    primitives::{MAGIC_BYTES, MAX_SNAPSHOT_SIZE, TOTAL_STAGES},
    progress_from_blob, progress_from_snapshot, progress_to_blob, progress_to_snapshot,
};
use serde_json::json;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

// =============================================================================
// OUTPUT MODE
// =============================================================================

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Print JSON instead of text.
    pub json_mode: bool,
    /// Also print each raw event.
    pub verbose: bool,
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Maximum backup size accepted by `import`.
const MAX_IMPORT_FILE_SIZE: u64 = MAX_SNAPSHOT_SIZE as u64;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), QuestError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| QuestError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(QuestError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Resolve an input path to an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, QuestError> {
    let canonical = path.canonicalize().map_err(|e| {
        QuestError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(QuestError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Resolve an output path whose parent directory must already exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, QuestError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        QuestError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(QuestError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| QuestError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Open the tracker on the configured backend.
pub fn open_tracker(config: &QuestConfig) -> Result<ProgressTracker, QuestError> {
    let backend = config.storage.open_backend()?;
    tracing::debug!(
        backend = backend.name(),
        path = %config.storage.path.display(),
        "opening tracker"
    );
    Ok(ProgressTracker::open(backend).with_options(config.tracker.options()))
}

/// Decode a backup file: a binary snapshot, or a JSON object in slot format.
///
/// Unlike slot loading, anything that is neither is rejected.
pub fn decode_backup(data: &[u8]) -> Result<QuestProgress, QuestError> {
    if data.starts_with(MAGIC_BYTES) {
        return progress_from_snapshot(data);
    }

    let text = std::str::from_utf8(data)
        .map_err(|_| QuestError::SerializationError("Backup is not UTF-8 text".to_string()))?;
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| QuestError::SerializationError(format!("Backup is not JSON: {}", e)))?;
    if !value.is_object() {
        return Err(QuestError::SerializationError(
            "Backup must be a JSON object".to_string(),
        ));
    }

    Ok(progress_from_blob(text))
}

fn describe_acknowledgment(definition: &StageDefinition) -> String {
    match definition.acknowledgment {
        Acknowledgment::Checkbox(field) => format!(
            "Tick `{}`, then run `quest complete {}`",
            field,
            definition.stage.get()
        ),
        Acknowledgment::Email => "Submit your email with `quest email <address>`".to_string(),
    }
}

/// Play one confetti batch in the terminal.
async fn celebrate_in_terminal(settings: &CelebrationConfig) -> Result<u32, QuestError> {
    let mut renderer = settings.renderer();
    let mut canvas = Canvas::new(settings.width as usize, settings.height as usize);
    renderer.trigger(settings.width as f32, settings.height as f32);
    terminal::play(&mut renderer, &mut canvas, settings.fps).await
}

/// Act on tracker events: print them, ring the bell, play confetti.
async fn present(
    events: &[QuestEvent],
    tracker: &ProgressTracker,
    config: &QuestConfig,
    out: Output,
) -> Result<(), QuestError> {
    if out.json_mode {
        print_json(&json!({
            "events": events,
            "next_stage": tracker.next_stage(),
            "complete": tracker.is_complete(),
        }));
        return Ok(());
    }

    let interactive = std::io::stdout().is_terminal();
    for event in events {
        if out.verbose {
            println!("  event: {}", serde_json::to_string(event).unwrap_or_default());
        }

        match event {
            QuestEvent::StageCompleted { stage } => {
                println!("✓ {} complete: {}", stage, StageDefinition::of(*stage).title);
            }
            QuestEvent::Celebrate { .. } => {
                if config.celebration.enabled && interactive {
                    celebrate_in_terminal(&config.celebration).await?;
                } else {
                    println!("🎉 Celebration!");
                }
            }
            QuestEvent::Navigate { view, .. } => println!("→ Next: {}", view),
            QuestEvent::Audio { cue } => {
                if interactive && *cue != AudioCue::Click {
                    print!("\x07");
                }
            }
        }
    }

    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show progress.
pub fn cmd_status(config: &QuestConfig, out: Output) -> Result<(), QuestError> {
    let tracker = open_tracker(config)?;
    let progress = tracker.progress();
    let completed: Vec<u8> = progress.completed_stages.iter().map(|s| s.get()).collect();

    if out.json_mode {
        print_json(&json!({
            "backend": tracker.backend().name(),
            "database": config.storage.path.to_string_lossy(),
            "completed_stages": completed,
            "next_stage": tracker.next_stage(),
            "complete": tracker.is_complete(),
            "user_email": progress.user_email,
            "video_watched": progress.video_watched,
            "sound_enabled": progress.sound_enabled,
            "resume_view": tracker.resume_view().to_string(),
        }));
        return Ok(());
    }

    println!("Quest Status");
    println!("============");
    println!("Backend:    {}", tracker.backend().name());
    println!("Database:   {:?}", config.storage.path);
    println!();
    println!("Progress:   {} / {} stages", completed.len(), TOTAL_STAGES);
    match StageId::new(tracker.next_stage()) {
        Ok(next) => println!("Next stage: {} ({})", next.get(), StageDefinition::of(next).title),
        Err(_) => println!("Next stage: none, all stages complete"),
    }
    println!(
        "Email:      {}",
        progress.user_email.as_deref().unwrap_or("(not set)")
    );
    println!(
        "Video:      {}",
        if progress.video_watched {
            "watched"
        } else {
            "not watched"
        }
    );
    println!(
        "Sound:      {}",
        if progress.sound_enabled { "on" } else { "off" }
    );
    println!("Resume at:  {}", tracker.resume_view());

    Ok(())
}

// =============================================================================
// MAP COMMAND
// =============================================================================

/// Show the journey map.
pub fn cmd_map(config: &QuestConfig, out: Output) -> Result<(), QuestError> {
    let tracker = open_tracker(config)?;
    let nodes = tracker.journey_map();

    if out.json_mode {
        let nodes: Vec<serde_json::Value> = nodes
            .iter()
            .map(|node| {
                json!({
                    "stage": node.definition.stage.get(),
                    "title": node.definition.title,
                    "status": node.status,
                    "label": node.status.label(),
                })
            })
            .collect();
        print_json(&json!({ "nodes": nodes, "next_stage": tracker.next_stage() }));
        return Ok(());
    }

    println!("Journey Map");
    println!("===========");
    for node in &nodes {
        let marker = match node.status {
            NodeStatus::Completed => "[✓]",
            NodeStatus::Current => "[>]",
            NodeStatus::Locked => "[ ]",
        };
        println!(
            "{} {}. {:<22} {}",
            marker,
            node.definition.stage.get(),
            node.definition.title,
            node.status.label()
        );
    }

    Ok(())
}

// =============================================================================
// NAVIGATION COMMANDS
// =============================================================================

/// Leave the welcome screen.
pub async fn cmd_start(config: &QuestConfig, out: Output) -> Result<(), QuestError> {
    let tracker = open_tracker(config)?;
    let events = tracker.start();
    present(&events, &tracker, config, out).await
}

/// Acknowledge the introductory video.
pub async fn cmd_video(config: &QuestConfig, out: Output) -> Result<(), QuestError> {
    let mut tracker = open_tracker(config)?;
    let events = tracker.acknowledge_video();
    present(&events, &tracker, config, out).await
}

/// Open a stage screen.
pub async fn cmd_open(config: &QuestConfig, out: Output, stage: u8) -> Result<(), QuestError> {
    let stage = StageId::new(stage)?;
    let tracker = open_tracker(config)?;
    let events = tracker.open_stage(stage)?;
    present(&events, &tracker, config, out).await?;

    if !out.json_mode {
        let definition = StageDefinition::of(stage);
        println!();
        println!("{}: {}", stage, definition.title);
        if tracker.progress().is_completed(stage) {
            println!("Already complete.");
        } else {
            println!("{}", describe_acknowledgment(definition));
        }
    }

    Ok(())
}

// =============================================================================
// COMPLETION COMMANDS
// =============================================================================

/// Complete a checkbox stage.
///
/// The stage must be openable; the email stage is completed through `email`.
pub async fn cmd_complete(config: &QuestConfig, out: Output, stage: u8) -> Result<(), QuestError> {
    let stage = StageId::new(stage)?;
    let mut tracker = open_tracker(config)?;
    tracker.open_stage(stage)?;

    let definition = StageDefinition::of(stage);
    if definition.acknowledgment == Acknowledgment::Email {
        eprintln!("{}", describe_acknowledgment(definition));
        return Ok(());
    }

    let events = tracker.complete_stage(stage);
    if events.is_empty() && !out.json_mode {
        println!("{} was already complete", stage);
        return Ok(());
    }
    present(&events, &tracker, config, out).await
}

/// Submit the final-stage email.
pub async fn cmd_email(config: &QuestConfig, out: Output, address: &str) -> Result<(), QuestError> {
    let mut tracker = open_tracker(config)?;
    tracker.open_stage(StageId::FINAL)?;

    let events = tracker.set_email(address)?;
    present(&events, &tracker, config, out).await
}

// =============================================================================
// PREFERENCE COMMANDS
// =============================================================================

/// Toggle sound effects.
pub async fn cmd_sound(config: &QuestConfig, out: Output) -> Result<(), QuestError> {
    let mut tracker = open_tracker(config)?;
    let (enabled, events) = tracker.toggle_sound();

    if out.json_mode {
        print_json(&json!({ "sound_enabled": enabled, "events": events }));
        return Ok(());
    }

    println!("Sound: {}", if enabled { "on" } else { "off" });
    present(&events, &tracker, config, out).await
}

/// Clear all progress.
pub fn cmd_reset(config: &QuestConfig, out: Output, yes: bool) -> Result<(), QuestError> {
    if !yes {
        eprintln!("This clears every completed stage. Re-run with --yes to confirm.");
        return Ok(());
    }

    let mut tracker = open_tracker(config)?;
    let events = tracker.reset();

    if out.json_mode {
        print_json(&json!({
            "reset": true,
            "events": events,
            "next_stage": tracker.next_stage(),
        }));
    } else {
        println!("Progress reset. Run `quest start` to begin again.");
    }
    Ok(())
}

// =============================================================================
// CELEBRATE COMMAND
// =============================================================================

/// Play the confetti animation, in the terminal or headless.
pub async fn cmd_celebrate(
    config: &QuestConfig,
    out: Output,
    animate: bool,
) -> Result<(), QuestError> {
    let settings = &config.celebration;
    let mut renderer = settings.renderer();
    let mut canvas = Canvas::new(settings.width as usize, settings.height as usize);
    let particles = renderer.trigger(settings.width as f32, settings.height as f32);

    let frames = if animate && !out.json_mode {
        terminal::play(&mut renderer, &mut canvas, settings.fps).await?
    } else {
        terminal::run_headless(&mut renderer, &mut canvas)
    };

    if out.json_mode {
        print_json(&json!({
            "particles": particles,
            "frames": frames,
            "width": settings.width,
            "height": settings.height,
        }));
    } else {
        println!(
            "Rendered {} frames of {} particles at {}x{}",
            frames, particles, settings.width, settings.height
        );
    }
    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Back up progress to a file.
pub fn cmd_export(config: &QuestConfig, output: &Path, format: &str) -> Result<(), QuestError> {
    let validated_output = validate_output_path(output)?;
    let tracker = open_tracker(config)?;

    let data = match format {
        "snapshot" => progress_to_snapshot(tracker.progress())?,
        "json" => progress_to_blob(tracker.progress())?.into_bytes(),
        _ => {
            return Err(QuestError::SerializationError(format!(
                "Unknown format: {}. Use: snapshot, json",
                format
            )));
        }
    };

    std::fs::write(&validated_output, &data)
        .map_err(|e| QuestError::IoError(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", data.len(), validated_output);

    Ok(())
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Restore progress from a backup.
pub fn cmd_import(config: &QuestConfig, out: Output, input: &Path) -> Result<(), QuestError> {
    let validated_path = validate_file_path(input)?;
    validate_file_size(&validated_path, MAX_IMPORT_FILE_SIZE)?;

    let data = std::fs::read(&validated_path)
        .map_err(|e| QuestError::IoError(format!("Read file: {}", e)))?;
    let progress = decode_backup(&data)?;

    let mut tracker = open_tracker(config)?;
    if !tracker.backend().is_durable() {
        tracing::warn!("importing into the memory backend; progress will not outlive this command");
    }
    tracker.restore(progress);

    if out.json_mode {
        print_json(&json!({
            "imported": true,
            "completed": tracker.progress().completed_stages.len(),
            "next_stage": tracker.next_stage(),
        }));
    } else {
        println!(
            "Imported progress: {} / {} stages complete",
            tracker.progress().completed_stages.len(),
            TOTAL_STAGES
        );
    }

    Ok(())
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(config: &QuestConfig) -> Result<(), QuestError> {
    let tracker = open_tracker(config)?;
    let addr = config.server.addr();

    println!("Quest Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:  {}", addr);
    println!("  Backend:  {}", tracker.backend().name());
    println!("  Database: {:?}", config.storage.path);
    println!();
    println!("Endpoints:");
    println!("  GET  /health                 - Health check");
    println!("  GET  /progress               - Current progress");
    println!("  GET  /map                    - Journey map");
    println!("  POST /start                  - Leave the welcome screen");
    println!("  POST /video                  - Acknowledge the video");
    println!("  POST /stages/{{n}}/open        - Open a stage");
    println!("  POST /stages/{{n}}/complete    - Complete a stage");
    println!("  POST /email                  - Submit email (final stage)");
    println!("  POST /sound/toggle           - Toggle sound");
    println!("  POST /reset                  - Clear progress");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&addr, tracker).await
}

// =============================================================================
// TESTS
// =============================================================================
