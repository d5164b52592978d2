//! Settings loading and saving.
//!
//! Settings live in `settings.json` under the storage root. A missing or
//! corrupt file yields defaults; writes go through a temp file + rename.

use std::io::Write;
use std::path::{Path, PathBuf};

use fs_err as fs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::aliases::AliasTable;
use crate::error::{AliasError, ReplaysError, Result};
use crate::path_utils::same_volume;
use crate::storage::StorageConfig;
use crate::template::{check_template, DEFAULT_FILENAME_TEMPLATE};
use crate::types::{NamingMode, PopupPathDisplayMode};

// ═══════════════════════════════════════════════════════════════════════════════
// Settings Types
// ═══════════════════════════════════════════════════════════════════════════════

/// One row of the editable alias list, as the settings panel stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasListItem {
    pub value: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl AliasListItem {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            selected: false,
            hidden: false,
        }
    }
}

/// Aliases shipped with a fresh install.
pub fn default_alias_list() -> Vec<AliasListItem> {
    vec![AliasListItem::new("C:\\Windows\\explorer.exe > Desktop")]
}

/// Sound and popup toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Master switch for sounds.
    pub sound_enabled: bool,
    pub sound_on_success: bool,
    pub sound_on_success_path: Option<PathBuf>,
    pub sound_on_failure: bool,
    pub sound_on_failure_path: Option<PathBuf>,
    /// Master switch for popups.
    pub popup_enabled: bool,
    pub popup_on_success: bool,
    pub popup_on_failure: bool,
    pub popup_path_display_mode: PopupPathDisplayMode,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            sound_on_success: false,
            sound_on_success_path: None,
            sound_on_failure: false,
            sound_on_failure_path: None,
            popup_enabled: true,
            popup_on_success: false,
            popup_on_failure: false,
            popup_path_display_mode: PopupPathDisplayMode::default(),
        }
    }
}

/// Persisted plugin settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub clips_naming_mode: NamingMode,
    pub clips_filename_template: String,
    /// Clip base folder. `None` means the host's recording directory.
    pub clips_base_path: Option<PathBuf>,
    /// Put each clip into a subfolder named after its base name.
    pub clips_save_to_folder: bool,
    pub clips_create_links: bool,
    pub clips_links_folder_path: Option<PathBuf>,
    pub custom_names_list: Vec<AliasListItem>,
    pub notifications: NotificationSettings,
    /// Restart the replay buffer after every saved clip.
    pub restart_buffer: bool,
    /// Periodic restart interval in seconds. 0 disables the loop.
    pub restart_buffer_loop: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clips_naming_mode: NamingMode::default(),
            clips_filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            clips_base_path: None,
            clips_save_to_folder: true,
            clips_create_links: false,
            clips_links_folder_path: None,
            custom_names_list: default_alias_list(),
            notifications: NotificationSettings::default(),
            restart_buffer: false,
            restart_buffer_loop: 0,
        }
    }
}

impl Settings {
    /// Raw `"path > name"` strings of the alias list.
    pub fn alias_values(&self) -> Vec<String> {
        self.custom_names_list
            .iter()
            .map(|item| item.value.clone())
            .collect()
    }

    pub fn load_aliases(&self) -> std::result::Result<AliasTable, AliasError> {
        AliasTable::load(&self.alias_values())
    }

    /// Clip base folder, defaulting to the host's recording directory.
    pub fn clips_base_path_or(&self, recording_dir: &Path) -> PathBuf {
        self.clips_base_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| recording_dir.to_path_buf())
    }

    /// Problems the settings panel should surface. Nothing here blocks saving.
    pub fn validate(&self, recording_dir: &Path) -> Vec<SettingsWarning> {
        let mut warnings = Vec::new();

        if let Err(error) = self.load_aliases() {
            warnings.push(SettingsWarning::InvalidAlias(error));
        }

        if check_template(&self.clips_filename_template).is_err() {
            warnings.push(SettingsWarning::InvalidTemplate);
        }

        if let Some(base) = &self.clips_base_path {
            if !same_volume(base, recording_dir) {
                warnings.push(SettingsWarning::BasePathOnOtherVolume(base.clone()));
            }
        }

        if self.clips_create_links {
            match &self.clips_links_folder_path {
                None => warnings.push(SettingsWarning::LinksFolderMissing),
                Some(links) if !same_volume(links, recording_dir) => {
                    warnings.push(SettingsWarning::LinksFolderOnOtherVolume(links.clone()))
                }
                Some(_) => {}
            }
        }

        warnings
    }
}

/// A settings problem, reported by [`Settings::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsWarning {
    InvalidAlias(AliasError),
    InvalidTemplate,
    /// Clips are renamed into place, which only works on the recording volume.
    BasePathOnOtherVolume(PathBuf),
    LinksFolderOnOtherVolume(PathBuf),
    LinksFolderMissing,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Persistence
// ═══════════════════════════════════════════════════════════════════════════════

/// Loads settings, returning defaults if the file is missing or unreadable.
/// Keys with invalid values fall back to their defaults individually.
pub fn load_settings(storage: &StorageConfig) -> Settings {
    let path = storage.settings_file();
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Settings::default(),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to read settings, using defaults");
            return Settings::default();
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(error = %err, path = %path.display(), "Settings file is not JSON, using defaults");
            return Settings::default();
        }
    };

    match serde_json::from_value(value.clone()) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, path = %path.display(), "Invalid settings, recovering field by field");
            recover_settings(value)
        }
    }
}

/// Applies top-level keys one at a time on top of the defaults, dropping only
/// those that fail to deserialize.
fn recover_settings(value: serde_json::Value) -> Settings {
    let serde_json::Value::Object(fields) = value else {
        tracing::error!("Settings root is not an object, using defaults");
        return Settings::default();
    };

    let mut settings = Settings::default();
    for (key, field) in fields {
        let Ok(serde_json::Value::Object(mut candidate)) = serde_json::to_value(&settings) else {
            break;
        };
        candidate.insert(key.clone(), field);

        match serde_json::from_value(serde_json::Value::Object(candidate)) {
            Ok(merged) => settings = merged,
            Err(err) => {
                tracing::error!(setting = %key, error = %err, "Invalid setting reset to default");
            }
        }
    }
    settings
}

/// Saves settings atomically.
pub fn save_settings(storage: &StorageConfig, settings: &Settings) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).map_err(|source| ReplaysError::Json {
        context: "serialize settings".to_string(),
        source,
    })?;
    write_atomic(&storage.settings_file(), content.as_bytes())
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let write_failed = |source: std::io::Error| ReplaysError::SettingsWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .ok_or_else(|| ReplaysError::FileNotFound(path.to_path_buf()))?;
    fs::create_dir_all(parent).map_err(write_failed)?;

    let mut temp_file = NamedTempFile::new_in(parent).map_err(write_failed)?;
    temp_file.write_all(content).map_err(write_failed)?;
    temp_file.flush().map_err(write_failed)?;
    temp_file.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Alias Import / Export
// ═══════════════════════════════════════════════════════════════════════════════

/// Writes the alias list into `folder` and returns the file path.
pub fn export_aliases(folder: &Path, items: &[AliasListItem]) -> Result<PathBuf> {
    if !folder.is_dir() {
        return Err(ReplaysError::FileNotFound(folder.to_path_buf()));
    }

    let path = StorageConfig::alias_export_file(folder);
    let content = serde_json::to_string(items).map_err(|source| ReplaysError::Json {
        context: "serialize alias list".to_string(),
        source,
    })?;
    fs::write(&path, content).map_err(|source| ReplaysError::Io {
        context: format!("write {}", path.display()),
        source,
    })?;

    tracing::info!(path = %path.display(), count = items.len(), "Aliases exported");
    Ok(path)
}

/// Reads an alias list previously written by [`export_aliases`].
///
/// The list is not validated here; it goes through the same all-or-nothing
/// load as a hand-edited list.
pub fn import_aliases(file: &Path) -> Result<Vec<AliasListItem>> {
    if !file.is_file() {
        return Err(ReplaysError::FileNotFound(file.to_path_buf()));
    }

    let content = fs::read_to_string(file).map_err(|source| ReplaysError::Io {
        context: format!("read {}", file.display()),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ReplaysError::Json {
        context: format!("parse {}", file.display()),
        source,
    })
}
