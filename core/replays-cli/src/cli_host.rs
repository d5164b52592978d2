//! Host implementation backed by command-line arguments.
//!
//! Outside OBS there is no replay buffer to control. The CLI describes a single
//! save: the file the host wrote, the foreground executable (or its PID) and the
//! scene. Buffer control calls are logged and otherwise ignored.

use std::path::PathBuf;
use std::time::Duration;

use replays_core::{
    executable_for_pid, Host, LookupError, Notifier, Popup, Scheduler, TimerId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Foreground {
    Executable(PathBuf),
    Pid(u32),
    None,
}

#[derive(Debug, Clone)]
pub struct ArgsHost {
    pub temp_path: PathBuf,
    pub foreground: Foreground,
    pub scene: String,
    pub recording_dir: PathBuf,
}

impl Host for ArgsHost {
    fn foreground_executable(&self) -> Result<PathBuf, LookupError> {
        match &self.foreground {
            Foreground::Executable(path) => Ok(path.clone()),
            Foreground::Pid(pid) => executable_for_pid(*pid),
            Foreground::None => Err(LookupError::NoActiveProcess),
        }
    }

    fn current_scene_name(&self) -> String {
        self.scene.clone()
    }

    fn last_replay_path(&self) -> Option<PathBuf> {
        Some(self.temp_path.clone())
    }

    fn recording_directory(&self) -> PathBuf {
        self.recording_dir.clone()
    }

    fn buffer_max_seconds(&self) -> u32 {
        0
    }

    fn replay_buffer_active(&self) -> bool {
        true
    }

    fn save_replay_buffer(&self) {
        tracing::debug!("Save requested; the file is already on disk");
    }

    fn start_replay_buffer(&self) {
        tracing::debug!("No replay buffer to start");
    }

    fn stop_replay_buffer(&self) {
        tracing::debug!("No replay buffer to stop");
    }

    fn can_begin_capture(&self) -> bool {
        true
    }
}

/// The CLI runs one save and exits, so timers never fire.
pub struct NoTimers;

impl Scheduler for NoTimers {
    fn add_timer(&self, timer: TimerId, interval: Duration) {
        tracing::debug!(?timer, interval_ms = interval.as_millis() as u64, "Timer ignored");
    }

    fn remove_timer(&self, _timer: TimerId) {}
}

/// Prints popups to stderr. Sounds are only logged.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn play_sound(&self, path: &std::path::Path) {
        tracing::info!(sound = %path.display(), "Notification sound");
    }

    fn show_popup(&self, popup: &Popup) {
        eprintln!("{}: {}", popup.title, popup.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(foreground: Foreground) -> ArgsHost {
        ArgsHost {
            temp_path: PathBuf::from("/rec/Replay.mkv"),
            foreground,
            scene: "Main".to_string(),
            recording_dir: PathBuf::from("/rec"),
        }
    }

    #[test]
    fn explicit_executable_is_returned() {
        let h = host(Foreground::Executable(PathBuf::from("/games/a.exe")));
        assert_eq!(h.foreground_executable().unwrap(), PathBuf::from("/games/a.exe"));
    }

    #[test]
    fn missing_foreground_is_lookup_error() {
        let h = host(Foreground::None);
        assert_eq!(h.foreground_executable(), Err(LookupError::NoActiveProcess));
        assert_eq!(
            host(Foreground::Pid(0)).foreground_executable(),
            Err(LookupError::NoActiveProcess)
        );
    }
}
