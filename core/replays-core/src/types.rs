//! Core types shared by the engine, the CLI and host bindings.
//!
//! Enum discriminants are persisted in settings and bound to hotkeys, so they
//! never change once released.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{LinkError, ReplaysError};

// ═══════════════════════════════════════════════════════════════════════════════
// Naming Modes
// ═══════════════════════════════════════════════════════════════════════════════

/// How a clip's base name is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum NamingMode {
    /// Executable of the foreground window at the moment of saving.
    CurrentProcess = 1,
    /// Executable that was in the foreground most of the recorded time.
    MostRecordedProcess = 2,
    /// Name of the current scene.
    CurrentScene = 3,
}

impl NamingMode {
    pub const ALL: [NamingMode; 3] = [
        NamingMode::CurrentProcess,
        NamingMode::MostRecordedProcess,
        NamingMode::CurrentScene,
    ];

    pub fn as_i64(self) -> i64 {
        self as i64
    }
}

impl Default for NamingMode {
    fn default() -> Self {
        NamingMode::CurrentProcess
    }
}

impl TryFrom<i64> for NamingMode {
    type Error = ReplaysError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NamingMode::CurrentProcess),
            2 => Ok(NamingMode::MostRecordedProcess),
            3 => Ok(NamingMode::CurrentScene),
            other => Err(ReplaysError::UnknownNamingMode(other)),
        }
    }
}

impl From<NamingMode> for i64 {
    fn from(mode: NamingMode) -> Self {
        mode.as_i64()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Popup Display
// ═══════════════════════════════════════════════════════════════════════════════

/// How much of the clip path a success popup shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum PopupPathDisplayMode {
    FullPath = 1,
    FolderAndFile = 2,
    JustFolder = 3,
    JustFile = 4,
}

impl Default for PopupPathDisplayMode {
    fn default() -> Self {
        PopupPathDisplayMode::FolderAndFile
    }
}

impl TryFrom<i64> for PopupPathDisplayMode {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PopupPathDisplayMode::FullPath),
            2 => Ok(PopupPathDisplayMode::FolderAndFile),
            3 => Ok(PopupPathDisplayMode::JustFolder),
            4 => Ok(PopupPathDisplayMode::JustFile),
            other => Err(format!("Unknown popup path display mode: {}", other)),
        }
    }
}

impl From<PopupPathDisplayMode> for i64 {
    fn from(mode: PopupPathDisplayMode) -> Self {
        mode as i64
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Placement Results
// ═══════════════════════════════════════════════════════════════════════════════

/// A clip that was moved into its final location.
#[derive(Debug)]
pub struct PlacedClip {
    /// Base name the clip was named after (alias, executable stem or scene).
    pub base_name: String,
    /// Final, unique path of the clip.
    pub path: PathBuf,
    /// Outcome of the optional hard link. `None` when links are disabled.
    pub link: Option<Result<PathBuf, LinkError>>,
}

impl PlacedClip {
    pub fn link_failed(&self) -> bool {
        matches!(self.link, Some(Err(_)))
    }
}
