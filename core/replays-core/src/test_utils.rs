//! Test doubles for [`Host`] and [`Scheduler`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::LookupError;
use crate::host::{Host, Scheduler, TimerId};

/// Scriptable host. Control calls are counted so tests can assert on them.
pub struct FakeHost {
    pub foreground: Mutex<Option<PathBuf>>,
    pub scene: Mutex<String>,
    pub last_replay: Mutex<Option<PathBuf>>,
    pub recording_dir: Mutex<PathBuf>,
    pub buffer_seconds: AtomicU32,
    pub buffer_active: AtomicBool,
    pub idle_seconds: AtomicU64,
    pub save_requests: AtomicU32,
    pub starts: AtomicU32,
    pub stops: AtomicU32,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            foreground: Mutex::new(None),
            scene: Mutex::new("Scene".to_string()),
            last_replay: Mutex::new(None),
            recording_dir: Mutex::new(PathBuf::from("/recordings")),
            buffer_seconds: AtomicU32::new(30),
            buffer_active: AtomicBool::new(true),
            idle_seconds: AtomicU64::new(u64::MAX),
            save_requests: AtomicU32::new(0),
            starts: AtomicU32::new(0),
            stops: AtomicU32::new(0),
        }
    }

    pub fn set_foreground(&self, path: Option<&str>) {
        *self.foreground.lock().unwrap() = path.map(PathBuf::from);
    }

    pub fn set_scene(&self, name: &str) {
        *self.scene.lock().unwrap() = name.to_string();
    }

    pub fn set_last_replay(&self, path: Option<PathBuf>) {
        *self.last_replay.lock().unwrap() = path;
    }

    pub fn set_recording_dir(&self, path: PathBuf) {
        *self.recording_dir.lock().unwrap() = path;
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for FakeHost {
    fn foreground_executable(&self) -> Result<PathBuf, LookupError> {
        self.foreground
            .lock()
            .unwrap()
            .clone()
            .ok_or(LookupError::NoActiveProcess)
    }

    fn current_scene_name(&self) -> String {
        self.scene.lock().unwrap().clone()
    }

    fn last_replay_path(&self) -> Option<PathBuf> {
        self.last_replay.lock().unwrap().clone()
    }

    fn recording_directory(&self) -> PathBuf {
        self.recording_dir.lock().unwrap().clone()
    }

    fn buffer_max_seconds(&self) -> u32 {
        self.buffer_seconds.load(Ordering::SeqCst)
    }

    fn replay_buffer_active(&self) -> bool {
        self.buffer_active.load(Ordering::SeqCst)
    }

    fn save_replay_buffer(&self) {
        self.save_requests.fetch_add(1, Ordering::SeqCst);
    }

    fn start_replay_buffer(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.buffer_active.store(true, Ordering::SeqCst);
    }

    fn stop_replay_buffer(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.buffer_active.store(false, Ordering::SeqCst);
    }

    fn can_begin_capture(&self) -> bool {
        !self.buffer_active.load(Ordering::SeqCst)
    }

    fn seconds_since_last_input(&self) -> u64 {
        self.idle_seconds.load(Ordering::SeqCst)
    }
}

/// Scheduler that only remembers which timers are registered.
#[derive(Default)]
pub struct RecordingScheduler {
    pub timers: Mutex<HashMap<TimerId, Duration>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interval(&self, timer: TimerId) -> Option<Duration> {
        self.timers.lock().unwrap().get(&timer).copied()
    }
}

impl Scheduler for RecordingScheduler {
    fn add_timer(&self, timer: TimerId, interval: Duration) {
        self.timers.lock().unwrap().insert(timer, interval);
    }

    fn remove_timer(&self, timer: TimerId) {
        self.timers.lock().unwrap().remove(&timer);
    }
}
