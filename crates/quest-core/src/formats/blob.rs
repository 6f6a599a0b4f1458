//! # Slot Blob Format
//!
//! The text stored in the durable slot: a flat JSON object.
//!
//! ```json
//! {"completedStages":[1,2],"soundEnabled":true,"userEmail":"","videoWatched":false}
//! ```
//!
//! Writing is strict. Reading is tolerant: anything unreadable degrades to
//! defaults field by field, and a blob that is not a JSON object at all yields
//! a fresh record. Loading never fails startup.

use crate::primitives::MAX_BLOB_SIZE;
use crate::{QuestError, QuestProgress, StageId};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Wire layout of the blob. Field order is the serialized key order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredProgress<'a> {
    completed_stages: Vec<u8>,
    sound_enabled: bool,
    user_email: &'a str,
    video_watched: bool,
}

/// Serialize progress to the slot blob.
pub fn progress_to_blob(progress: &QuestProgress) -> Result<String, QuestError> {
    let stored = StoredProgress {
        completed_stages: progress.completed_stages.iter().map(|s| s.get()).collect(),
        sound_enabled: progress.sound_enabled,
        user_email: progress.user_email.as_deref().unwrap_or(""),
        video_watched: progress.video_watched,
    };
    serde_json::to_string(&stored).map_err(|e| QuestError::SerializationError(e.to_string()))
}

/// Deserialize progress from a slot blob, falling back to defaults.
pub fn progress_from_blob(blob: &str) -> QuestProgress {
    if blob.len() > MAX_BLOB_SIZE {
        tracing::warn!(
            size = blob.len(),
            max = MAX_BLOB_SIZE,
            "stored progress too large, starting fresh"
        );
        return QuestProgress::new();
    }

    let parsed: Value = match serde_json::from_str(blob) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "stored progress is not valid JSON, starting fresh");
            return QuestProgress::new();
        }
    };

    match parsed.as_object() {
        Some(fields) => progress_from_fields(fields),
        None => {
            tracing::warn!("stored progress is not a JSON object, starting fresh");
            QuestProgress::new()
        }
    }
}

fn progress_from_fields(fields: &Map<String, Value>) -> QuestProgress {
    let completed_stages: BTreeSet<StageId> = fields
        .get("completedStages")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_u64)
                .filter_map(|n| u8::try_from(n).ok())
                .filter_map(|n| StageId::new(n).ok())
                .collect()
        })
        .unwrap_or_default();

    let user_email = fields
        .get("userEmail")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string);

    let video_watched = fields
        .get("videoWatched")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    // Only an explicit `false` turns sound off.
    let sound_enabled = !matches!(fields.get("soundEnabled"), Some(Value::Bool(false)));

    QuestProgress {
        completed_stages,
        user_email,
        video_watched,
        sound_enabled,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(n: u8) -> StageId {
        StageId::new(n).expect("valid stage")
    }

    #[test]
    fn blob_uses_flat_camel_case_keys() {
        let mut progress = QuestProgress::new();
        progress.mark_completed(stage(2));
        progress.mark_completed(stage(1));

        let blob = progress_to_blob(&progress).expect("serialize");
        assert_eq!(
            blob,
            r#"{"completedStages":[1,2],"soundEnabled":true,"userEmail":"","videoWatched":false}"#
        );
    }

    #[test]
    fn blob_roundtrip_preserves_fields() {
        let mut progress = QuestProgress::new();
        for n in [3, 1, 2] {
            progress.mark_completed(stage(n));
        }
        progress.user_email = Some("user@example.com".to_string());
        progress.video_watched = true;
        progress.sound_enabled = false;

        let blob = progress_to_blob(&progress).expect("serialize");
        assert_eq!(progress_from_blob(&blob), progress);
    }

    #[test]
    fn missing_fields_default_independently() {
        let progress = progress_from_blob(r#"{"videoWatched":true}"#);
        assert!(progress.completed_stages.is_empty());
        assert_eq!(progress.user_email, None);
        assert!(progress.video_watched);
        assert!(progress.sound_enabled);
    }

    #[test]
    fn garbage_yields_fresh_progress() {
        assert_eq!(progress_from_blob("{not json"), QuestProgress::new());
        assert_eq!(progress_from_blob("[1,2,3]"), QuestProgress::new());
        assert_eq!(progress_from_blob(""), QuestProgress::new());
    }

    #[test]
    fn mistyped_fields_fall_back() {
        let progress = progress_from_blob(
            r#"{"completedStages":"1,2","soundEnabled":"no","userEmail":42,"videoWatched":1}"#,
        );
        assert!(progress.completed_stages.is_empty());
        assert!(progress.sound_enabled);
        assert_eq!(progress.user_email, None);
        assert!(!progress.video_watched);
    }

    #[test]
    fn invalid_and_duplicate_stages_are_dropped() {
        let progress = progress_from_blob(r#"{"completedStages":[0,1,1,9,10,300,-2,2.5]}"#);
        let stages: Vec<u8> = progress.completed_stages.iter().map(|s| s.get()).collect();
        assert_eq!(stages, vec![1, 9]);
    }

    #[test]
    fn explicit_false_disables_sound() {
        assert!(!progress_from_blob(r#"{"soundEnabled":false}"#).sound_enabled);
        assert!(progress_from_blob(r#"{"soundEnabled":null}"#).sound_enabled);
    }
}
