//! Storage configuration and path management for Smart Replays.
//!
//! Production code uses `StorageConfig::default()` which points to `~/.smart-replays/`.
//! Tests use `StorageConfig::with_root(temp_dir)` for isolation.

use std::path::{Path, PathBuf};

/// File name used when exporting the alias list.
pub const ALIAS_EXPORT_FILE_NAME: &str = "obs_smart_replays_custom_names.json";

/// Central configuration for all Smart Replays storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all Smart Replays data (default: ~/.smart-replays)
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let root = dirs::home_dir()
            .map(|home| home.join(".smart-replays"))
            .unwrap_or_else(|| PathBuf::from(".smart-replays"));
        Self { root }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    /// Used for testing with temp directories.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to settings.json (persisted plugin settings).
    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    /// Path to logs/ directory (rolling CLI logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Alias export file inside a user-chosen folder.
    pub fn alias_export_file(folder: &Path) -> PathBuf {
        folder.join(ALIAS_EXPORT_FILE_NAME)
    }
}
