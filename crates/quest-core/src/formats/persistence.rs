//! # Snapshot Format
//!
//! Binary backups of a progress record, used by export/import.
//!
//! Format: Header (5 bytes) + postcard-serialized `QuestProgress`.
//! - 4 bytes: Magic ("QUST")
//! - 1 byte: Version
//!
//! Unlike the slot blob, snapshots are decoded strictly: a backup that does not
//! validate is rejected instead of silently replaced by defaults.

use crate::{QuestError, QuestProgress, primitives};

/// Header size in bytes.
const HEADER_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The snapshot header precedes the payload.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Create a new header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), QuestError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(QuestError::SerializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(QuestError::SerializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, QuestError> {
        let Some(header) = bytes.get(..HEADER_SIZE) else {
            return Err(QuestError::SerializationError(
                "Header too short".to_string(),
            ));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[0..4]);
        Ok(Self {
            magic,
            version: header[4],
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize progress to snapshot bytes (header + payload).
pub fn progress_to_snapshot(progress: &QuestProgress) -> Result<Vec<u8>, QuestError> {
    let payload = postcard::to_stdvec(progress)
        .map_err(|e| QuestError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());
    result.extend_from_slice(&SnapshotHeader::new().to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize progress from snapshot bytes.
///
/// Size and header are validated before the payload is decoded.
pub fn progress_from_snapshot(bytes: &[u8]) -> Result<QuestProgress, QuestError> {
    if bytes.len() > primitives::MAX_SNAPSHOT_SIZE {
        return Err(QuestError::SerializationError(format!(
            "Snapshot size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            primitives::MAX_SNAPSHOT_SIZE
        )));
    }

    let header = SnapshotHeader::from_bytes(bytes)?;
    header.validate()?;

    postcard::from_bytes(&bytes[HEADER_SIZE..]).map_err(|e| {
        QuestError::SerializationError(format!("Failed to decode snapshot payload: {}", e))
    })
}

// =============================================================================
// TESTS
// =============================================================================
