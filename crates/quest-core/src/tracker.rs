//! # Progress Tracker
//!
//! The stage-progression state machine. One tracker owns one
//! [`QuestProgress`] and the slot it is persisted to.
//!
//! - Constructed explicitly at startup from a storage backend
//! - Every user action maps to one synchronous method call
//! - Every mutation is written back to the slot immediately
//! - Writes are best-effort: failures are logged and the in-memory state stays
//!   authoritative for the rest of the session
//!
//! Commands return the [`QuestEvent`]s they produce instead of performing view
//! switches or playing sounds; the caller owns those side effects.

use crate::formats::{progress_from_blob, progress_to_blob};
use crate::primitives::DEFAULT_NAVIGATE_DELAY_MS;
use crate::storage::{SlotBackend, SlotStore};
use crate::system::{MapNode, celebrates, journey_map};
use crate::{AudioCue, QuestError, QuestEvent, QuestProgress, StageId, View};

// =============================================================================
// OPTIONS
// =============================================================================

/// Tunables for a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Delay attached to post-completion "navigate" events.
    pub navigate_delay_ms: u64,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            navigate_delay_ms: DEFAULT_NAVIGATE_DELAY_MS,
        }
    }
}

// =============================================================================
// EMAIL VALIDATION
// =============================================================================

/// Whitespace as browsers see it: Unicode whitespace plus the byte order mark.
fn is_form_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Validate an email submission and return the trimmed address.
///
/// Accepts exactly `^[^\s@]+@[^\s@]+\.[^\s@]+$`: one `@`, no whitespace, and a
/// dot in the domain with at least one character on each side. There is no
/// length limit.
pub fn validate_email(input: &str) -> Result<&str, QuestError> {
    let email = input.trim_matches(is_form_space);

    if email.is_empty() || email.chars().any(is_form_space) {
        return Err(QuestError::InvalidEmail);
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(QuestError::InvalidEmail);
    };

    let has_inner_dot = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());

    if local.is_empty() || !has_inner_dot {
        return Err(QuestError::InvalidEmail);
    }

    Ok(email)
}

// =============================================================================
// TRACKER
// =============================================================================

/// Owner of the quest progress.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    /// Where progress is persisted.
    backend: SlotBackend,
    /// The authoritative in-memory state.
    progress: QuestProgress,
    options: TrackerOptions,
}

impl ProgressTracker {
    /// Create a fresh tracker backed by a volatile in-memory slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a tracker on a backend, rehydrating whatever the slot holds.
    ///
    /// A missing, unreadable or malformed slot yields fresh progress; opening
    /// never fails.
    #[must_use]
    pub fn open(backend: SlotBackend) -> Self {
        let progress = match backend.get() {
            Ok(Some(blob)) => progress_from_blob(&blob),
            Ok(None) => {
                tracing::debug!(backend = backend.name(), "no stored progress, starting fresh");
                QuestProgress::new()
            }
            Err(e) => {
                tracing::warn!(
                    backend = backend.name(),
                    error = %e,
                    "could not read stored progress, starting fresh"
                );
                QuestProgress::new()
            }
        };

        Self {
            backend,
            progress,
            options: TrackerOptions::default(),
        }
    }

    /// Replace the tracker options.
    #[must_use]
    pub fn with_options(mut self, options: TrackerOptions) -> Self {
        self.options = options;
        self
    }

    /// Get a reference to the progress record.
    #[must_use]
    pub fn progress(&self) -> &QuestProgress {
        &self.progress
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn backend(&self) -> &SlotBackend {
        &self.backend
    }

    #[must_use]
    pub fn options(&self) -> TrackerOptions {
        self.options
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Smallest stage not yet completed, or `ALL_COMPLETE`.
    #[must_use]
    pub fn next_stage(&self) -> u8 {
        self.progress.next_stage()
    }

    /// Check if a stage lies strictly after the next stage.
    #[must_use]
    pub fn is_locked(&self, stage: StageId) -> bool {
        self.progress.is_locked(stage)
    }

    /// Check if the whole quest is done.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress.is_complete()
    }

    /// View to show at startup.
    #[must_use]
    pub fn resume_view(&self) -> View {
        if self.progress.has_started() {
            View::Map
        } else {
            View::Welcome
        }
    }

    /// Journey map nodes in stage order.
    #[must_use]
    pub fn journey_map(&self) -> Vec<MapNode> {
        journey_map(&self.progress)
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Complete a stage.
    ///
    /// Completing an already-completed stage changes nothing and emits nothing.
    pub fn complete_stage(&mut self, stage: StageId) -> Vec<QuestEvent> {
        if !self.progress.mark_completed(stage) {
            tracing::debug!(stage = stage.get(), "stage already completed");
            return Vec::new();
        }
        self.persist();

        tracing::info!(
            stage = stage.get(),
            next_stage = self.next_stage(),
            "stage completed"
        );

        let delay_ms = self.options.navigate_delay_ms;
        let mut events = vec![QuestEvent::StageCompleted { stage }];
        events.extend(self.cue(AudioCue::StageComplete));

        if celebrates(stage) {
            events.push(QuestEvent::Celebrate { stage });
        }

        if stage.is_final() {
            events.push(QuestEvent::Navigate {
                view: View::Celebration,
                delay_ms,
            });
            events.extend(self.cue(AudioCue::Celebration));
            // The celebration screen fires its own burst once it is shown.
            events.push(QuestEvent::Celebrate { stage });
        } else {
            events.push(QuestEvent::Navigate {
                view: View::Map,
                delay_ms,
            });
        }

        events
    }

    /// Submit the final-stage email. On success the email is stored and the
    /// final stage is completed; on failure nothing changes.
    pub fn set_email(&mut self, input: &str) -> Result<Vec<QuestEvent>, QuestError> {
        let email = match validate_email(input) {
            Ok(email) => email.to_string(),
            Err(e) => {
                tracing::debug!("rejected email submission");
                return Err(e);
            }
        };

        self.progress.user_email = Some(email);
        self.persist();

        Ok(self.complete_stage(StageId::FINAL))
    }

    /// Clear completed stages, email and video flag, then return to the
    /// welcome screen. The sound preference is kept.
    pub fn reset(&mut self) -> Vec<QuestEvent> {
        self.progress.clear();
        self.persist();
        tracing::info!("progress reset");

        let mut events: Vec<QuestEvent> = self.cue(AudioCue::Click).into_iter().collect();
        events.push(QuestEvent::Navigate {
            view: View::Welcome,
            delay_ms: 0,
        });
        events
    }

    /// Leave the welcome screen for the introductory video.
    pub fn start(&self) -> Vec<QuestEvent> {
        let mut events: Vec<QuestEvent> = self.cue(AudioCue::Click).into_iter().collect();
        events.push(QuestEvent::Navigate {
            view: View::Video,
            delay_ms: 0,
        });
        events
    }

    /// Mark the introductory video as watched and move on to the map.
    pub fn acknowledge_video(&mut self) -> Vec<QuestEvent> {
        if !self.progress.video_watched {
            self.progress.video_watched = true;
            self.persist();
        }

        let mut events: Vec<QuestEvent> = self.cue(AudioCue::Click).into_iter().collect();
        events.push(QuestEvent::Navigate {
            view: View::Map,
            delay_ms: 0,
        });
        events
    }

    /// Navigate to a stage screen. Locked stages are refused; completed stages
    /// stay open for review.
    pub fn open_stage(&self, stage: StageId) -> Result<Vec<QuestEvent>, QuestError> {
        if !self.progress.can_open(stage) {
            return Err(QuestError::StageLocked(stage));
        }

        let mut events: Vec<QuestEvent> = self.cue(AudioCue::Click).into_iter().collect();
        events.push(QuestEvent::Navigate {
            view: View::Stage(stage),
            delay_ms: 0,
        });
        Ok(events)
    }

    /// Flip the sound preference. Returns the new value and, when sound was just
    /// turned on, a click cue.
    pub fn toggle_sound(&mut self) -> (bool, Vec<QuestEvent>) {
        self.progress.sound_enabled = !self.progress.sound_enabled;
        self.persist();

        let events = self.cue(AudioCue::Click).into_iter().collect();
        (self.progress.sound_enabled, events)
    }

    /// Replace the whole progress record (snapshot import) and persist it.
    pub fn restore(&mut self, progress: QuestProgress) {
        self.progress = progress;
        self.persist();
        tracing::info!(
            completed = self.progress.completed_stages.len(),
            "progress restored"
        );
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// An audio cue event, if sound is enabled.
    fn cue(&self, cue: AudioCue) -> Option<QuestEvent> {
        self.progress
            .sound_enabled
            .then_some(QuestEvent::Audio { cue })
    }

    /// Write the current progress to the slot, best-effort.
    fn persist(&mut self) {
        let result = progress_to_blob(&self.progress).and_then(|blob| self.backend.set(&blob));
        if let Err(e) = result {
            tracing::warn!(
                backend = self.backend.name(),
                error = %e,
                "failed to persist progress, keeping in-memory state"
            );
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
