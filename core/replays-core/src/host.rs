//! Host application interfaces.
//!
//! The recording host owns nearly all state the core needs: the foreground
//! window, the scene list, output directories and replay buffer control. The
//! core only talks to it through [`Host`], and schedules its periodic work
//! through [`Scheduler`], so every component can run against test doubles.

use std::path::PathBuf;
use std::time::Duration;

use sysinfo::{Pid, ProcessRefreshKind, System, UpdateKind};

use crate::error::LookupError;

/// Capabilities the core consumes from the recording host.
///
/// Implementors should:
/// - Return `Err` from [`Host::foreground_executable`] instead of panicking
/// - Make [`Host::stop_replay_buffer`] and [`Host::start_replay_buffer`] safe to
///   call off the host's callback thread
pub trait Host: Send + Sync {
    /// Executable of the process that owns the foreground window.
    fn foreground_executable(&self) -> Result<PathBuf, LookupError>;

    fn current_scene_name(&self) -> String;

    /// Temporary path of the replay the host just saved.
    fn last_replay_path(&self) -> Option<PathBuf>;

    /// The host's own recording output directory.
    fn recording_directory(&self) -> PathBuf;

    /// Configured replay buffer length in seconds.
    fn buffer_max_seconds(&self) -> u32;

    fn replay_buffer_active(&self) -> bool;

    /// Asks the host to save the replay buffer. Completion arrives later as
    /// [`crate::engine::HostEvent::ReplayBufferSaved`].
    fn save_replay_buffer(&self);

    fn start_replay_buffer(&self);

    fn stop_replay_buffer(&self);

    /// True once a stopped buffer can be started again.
    fn can_begin_capture(&self) -> bool;

    /// Seconds since the last keyboard or mouse input.
    fn seconds_since_last_input(&self) -> u64 {
        u64::MAX
    }
}

/// Periodic callbacks registered with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Samples the foreground process into the ring history.
    ClipHistory,
    /// Samples the foreground process into the counting history.
    RecordingHistory,
    /// Periodic replay buffer restart.
    RestartLoop,
}

/// Host timer registration. Re-adding a timer replaces its interval.
pub trait Scheduler: Send + Sync {
    fn add_timer(&self, timer: TimerId, interval: Duration);

    fn remove_timer(&self, timer: TimerId);
}

/// Looks up a process's executable path by PID.
///
/// Hosts that only know the foreground window's PID can use this to implement
/// [`Host::foreground_executable`].
pub fn executable_for_pid(pid: u32) -> Result<PathBuf, LookupError> {
    if pid == 0 {
        return Err(LookupError::NoActiveProcess);
    }

    let mut sys = System::new();
    let sys_pid = Pid::from(pid as usize);
    sys.refresh_process_specifics(
        sys_pid,
        ProcessRefreshKind::new().with_exe(UpdateKind::OnlyIfNotSet),
    );

    sys.process(sys_pid)
        .and_then(|process| process.exe())
        .map(|exe| exe.to_path_buf())
        .ok_or(LookupError::ProcessInaccessible { pid })
}
