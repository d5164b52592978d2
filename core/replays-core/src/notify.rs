//! Success/failure notifications after a save.
//!
//! This module only decides what to show; playing sounds and drawing popups is
//! the host's job through [`Notifier`].

use std::path::{Path, PathBuf};

use crate::config::NotificationSettings;
use crate::types::PopupPathDisplayMode;

pub const SUCCESS_COLOR: &str = "#76B900";
pub const FAILURE_COLOR: &str = "#C00000";

/// Delivers notifications. Implementations should never panic on a bad sound path.
pub trait Notifier: Send + Sync {
    fn play_sound(&self, path: &Path);

    fn show_popup(&self, popup: &Popup);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub message: String,
    pub color: &'static str,
}

/// What to deliver for one save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationPlan {
    pub sound: Option<PathBuf>,
    pub popup: Option<Popup>,
}

impl NotificationPlan {
    pub fn is_empty(&self) -> bool {
        self.sound.is_none() && self.popup.is_none()
    }

    pub fn deliver(&self, notifier: &dyn Notifier) {
        if let Some(sound) = &self.sound {
            notifier.play_sound(sound);
        }
        if let Some(popup) = &self.popup {
            notifier.show_popup(popup);
        }
    }
}

/// Builds the plan for a save. `saved` is the clip path, `None` on failure.
pub fn plan_notification(saved: Option<&Path>, settings: &NotificationSettings) -> NotificationPlan {
    match saved {
        Some(path) => NotificationPlan {
            sound: (settings.sound_enabled && settings.sound_on_success)
                .then(|| settings.sound_on_success_path.clone())
                .flatten(),
            popup: (settings.popup_enabled && settings.popup_on_success).then(|| Popup {
                title: "Clip saved".to_string(),
                message: format!(
                    "Clip saved to {}",
                    display_path(path, settings.popup_path_display_mode)
                ),
                color: SUCCESS_COLOR,
            }),
        },
        None => NotificationPlan {
            sound: (settings.sound_enabled && settings.sound_on_failure)
                .then(|| settings.sound_on_failure_path.clone())
                .flatten(),
            popup: (settings.popup_enabled && settings.popup_on_failure).then(|| Popup {
                title: "Clip not saved".to_string(),
                message: "More in the logs.".to_string(),
                color: FAILURE_COLOR,
            }),
        },
    }
}

/// Formats a clip path for a popup.
pub fn display_path(path: &Path, mode: PopupPathDisplayMode) -> String {
    let file = path.file_name().map(Path::new);
    let folder = path.parent().and_then(Path::file_name).map(Path::new);

    let shown = match mode {
        PopupPathDisplayMode::FullPath => Some(path.to_path_buf()),
        PopupPathDisplayMode::FolderAndFile => match (folder, file) {
            (Some(folder), Some(file)) => Some(folder.join(file)),
            (None, file) => file.map(Path::to_path_buf),
            (folder, None) => folder.map(Path::to_path_buf),
        },
        PopupPathDisplayMode::JustFolder => folder.map(Path::to_path_buf),
        PopupPathDisplayMode::JustFile => file.map(Path::to_path_buf),
    };

    shown.unwrap_or_else(|| path.to_path_buf()).display().to_string()
}
