//! # Configuration
//!
//! Settings loaded from `quest.toml`. Every key is optional; a missing file
//! means all defaults. Command-line flags override file values.
//!
//! ```toml
//! [storage]
//! backend = "redb"        # memory | file | redb
//! path = "quest.db"
//! slot = "nsQuestState"
//!
//! [tracker]
//! navigate_delay_ms = 500
//!
//! [celebration]
//! enabled = true
//! fps = 60
//! width = 960
//! height = 540
//! # seed = 42
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! ```

use clap::ValueEnum;
use quest_core::primitives::{DEFAULT_NAVIGATE_DELAY_MS, DEFAULT_SLOT_KEY};
use quest_core::{
    CelebrationRenderer, FileSlot, MAX_CANVAS_SIDE, MemorySlot, QuestError, RedbSlot, SlotBackend,
    TrackerOptions,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "quest.toml";

/// Upper bound for the celebration frame rate.
pub const MAX_FPS: u32 = 240;

/// Upper bound for each side of the celebration viewport, in pixels.
pub const MAX_VIEWPORT_SIDE: u32 = MAX_CANVAS_SIDE as u32;

// =============================================================================
// STORAGE
// =============================================================================

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Volatile; progress is lost on exit.
    Memory,
    /// A plain JSON file.
    File,
    /// A named slot in a redb database.
    #[default]
    Redb,
}

impl BackendKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::File => "file",
            BackendKind::Redb => "redb",
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// Database file (redb) or blob file (file). Unused for memory.
    pub path: PathBuf,
    /// Slot name inside the redb database.
    pub slot: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: PathBuf::from("quest.db"),
            slot: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    /// Open the configured slot backend.
    pub fn open_backend(&self) -> Result<SlotBackend, QuestError> {
        match self.backend {
            BackendKind::Memory => Ok(SlotBackend::Memory(MemorySlot::new())),
            BackendKind::File => Ok(SlotBackend::File(FileSlot::new(&self.path))),
            BackendKind::Redb => {
                RedbSlot::open(&self.path, self.slot.clone()).map(SlotBackend::Redb)
            }
        }
    }
}

// =============================================================================
// TRACKER
// =============================================================================

/// `[tracker]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    pub navigate_delay_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            navigate_delay_ms: DEFAULT_NAVIGATE_DELAY_MS,
        }
    }
}

impl TrackerConfig {
    #[must_use]
    pub fn options(&self) -> TrackerOptions {
        TrackerOptions {
            navigate_delay_ms: self.navigate_delay_ms,
        }
    }
}

// =============================================================================
// CELEBRATION
// =============================================================================

/// `[celebration]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CelebrationConfig {
    /// Play confetti when a completion asks for it.
    pub enabled: bool,
    /// Frames per second for terminal playback.
    pub fps: u32,
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Fixed particle seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fps: 60,
            width: 960,
            height: 540,
            seed: None,
        }
    }
}

impl CelebrationConfig {
    /// Build a renderer honoring the configured seed.
    #[must_use]
    pub fn renderer(&self) -> CelebrationRenderer {
        self.seed
            .map(CelebrationRenderer::with_seed)
            .unwrap_or_default()
    }
}

// =============================================================================
// SERVER
// =============================================================================

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// ROOT
// =============================================================================

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuestConfig {
    pub storage: StorageConfig,
    pub tracker: TrackerConfig,
    pub celebration: CelebrationConfig,
    pub server: ServerConfig,
}

impl QuestConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `quest.toml` in the working
    /// directory is used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, QuestError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, QuestError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            QuestError::IoError(format!("Read config {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_toml(text: &str) -> Result<Self, QuestError> {
        let config: Self = toml::from_str(text)
            .map_err(|e| QuestError::SerializationError(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), QuestError> {
        let celebration = &self.celebration;
        if celebration.fps == 0 || celebration.fps > MAX_FPS {
            return Err(QuestError::SerializationError(format!(
                "Invalid config: celebration.fps must be in 1..={}",
                MAX_FPS
            )));
        }
        let sides = 1..=MAX_VIEWPORT_SIDE;
        if !sides.contains(&celebration.width) || !sides.contains(&celebration.height) {
            return Err(QuestError::SerializationError(format!(
                "Invalid config: celebration width and height must be in 1..={}",
                MAX_VIEWPORT_SIDE
            )));
        }
        if self.storage.slot.is_empty() {
            return Err(QuestError::SerializationError(
                "Invalid config: storage.slot must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::SlotStore;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = QuestConfig::from_toml("").expect("parse");
        assert_eq!(config, QuestConfig::default());
        assert_eq!(config.storage.backend, BackendKind::Redb);
        assert_eq!(config.storage.slot, "nsQuestState");
        assert_eq!(config.tracker.navigate_delay_ms, 500);
        assert_eq!(config.server.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = QuestConfig::from_toml(
            r#"
            [storage]
            backend = "file"

            [celebration]
            seed = 7
            "#,
        )
        .expect("parse");

        assert_eq!(config.storage.backend, BackendKind::File);
        assert_eq!(config.storage.path, PathBuf::from("quest.db"));
        assert_eq!(config.celebration.seed, Some(7));
        assert_eq!(config.celebration.fps, 60);
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(QuestConfig::from_toml("[storage]\nbogus = 1").is_err());
        assert!(QuestConfig::from_toml("[storage]\nbackend = \"s3\"").is_err());
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(QuestConfig::from_toml("[celebration]\nfps = 0").is_err());
        assert!(QuestConfig::from_toml("[celebration]\nwidth = 0").is_err());
        assert!(QuestConfig::from_toml("[storage]\nslot = \"\"").is_err());
    }

    #[test]
    fn oversized_viewport_rejected() {
        let huge = QuestConfig::from_toml(
            "[celebration]\nwidth = 4294967295\nheight = 4294967295",
        );
        assert!(matches!(huge, Err(QuestError::SerializationError(_))));
        assert!(QuestConfig::from_toml("[celebration]\nheight = 8193").is_err());

        let largest = QuestConfig::from_toml("[celebration]\nwidth = 8192\nheight = 8192");
        assert!(largest.is_ok());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let result = QuestConfig::load(Some(&temp.path().join("absent.toml")));
        assert!(matches!(result, Err(QuestError::IoError(_))));
    }

    #[test]
    fn opens_each_backend() {
        let temp = tempfile::tempdir().expect("temp dir");

        let mut storage = StorageConfig {
            backend: BackendKind::Memory,
            ..StorageConfig::default()
        };
        assert_eq!(storage.open_backend().expect("memory").name(), "memory");

        storage.backend = BackendKind::File;
        storage.path = temp.path().join("quest.json");
        let backend = storage.open_backend().expect("file");
        assert_eq!(backend.get().expect("get"), None);

        storage.backend = BackendKind::Redb;
        storage.path = temp.path().join("quest.redb");
        assert!(storage.open_backend().expect("redb").is_durable());
    }

    #[test]
    fn seeded_renderers_match() {
        let config = CelebrationConfig {
            seed: Some(3),
            ..CelebrationConfig::default()
        };
        let mut a = config.renderer();
        let mut b = config.renderer();
        a.trigger(100.0, 100.0);
        b.trigger(100.0, 100.0);
        assert_eq!(a.batches()[0].particles(), b.batches()[0].particles());
    }
}
