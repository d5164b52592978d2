//! ReplaysEngine - the entry point host bindings talk to.
//!
//! The engine owns the settings, the alias table, the process tracker and the
//! force-mode gate, and reacts to host events:
//!
//! ```text
//! ReplayBufferStarted → ring history + 1s sampling timer (+ restart loop timer)
//! ReplayBufferStopped → timers removed, ring discarded, pending force mode dropped
//! ReplayBufferSaved   → placement (forced or configured mode) → restart? → notify
//! RecordingStarted    → counting history + 1s sampling timer
//! RecordingStopped    → timer removed, counter discarded
//! ```
//!
//! The engine is not thread-safe by itself. Hosts that dispatch callbacks on
//! several threads wrap it in a `Mutex`.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use replays_core::{HostEvent, ReplaysEngine};
//!
//! let mut engine = ReplaysEngine::new(host, scheduler);
//! engine.handle_event(HostEvent::ReplayBufferStarted);
//! engine.on_clip_history_tick();
//! let report = engine.handle_event(HostEvent::ReplayBufferSaved);
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::aliases::{prune_invalid_aliases, AliasTable};
use crate::config::{load_settings, save_settings, Settings};
use crate::error::{LookupError, PlacementError, Result};
use crate::force_mode::ForceModeGate;
use crate::host::{Host, Scheduler, TimerId};
use crate::naming::{resolve_base_name, CaptureKind, NamingContext};
use crate::notify::{plan_notification, NotificationPlan, Notifier};
use crate::placement::{place_clip, PlacementContext};
use crate::restart::{plan_restart, spawn_buffer_restart, RestartDecision};
use crate::storage::StorageConfig;
use crate::tracker::ProcessTracker;
use crate::types::{NamingMode, PlacedClip};

const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Host lifecycle events the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    ReplayBufferStarted,
    ReplayBufferStopped,
    ReplayBufferSaved,
    RecordingStarted,
    RecordingStopped,
}

/// What happened to one saved replay.
#[derive(Debug)]
pub struct SaveReport {
    pub result: std::result::Result<PlacedClip, PlacementError>,
    /// Mode forced by a hotkey for this save, if any.
    pub forced_mode: Option<NamingMode>,
    pub restart_spawned: bool,
    pub notification: NotificationPlan,
}

pub struct ReplaysEngine {
    storage: StorageConfig,
    settings: Settings,
    aliases: AliasTable,
    tracker: ProcessTracker,
    force_mode: ForceModeGate,
    host: Arc<dyn Host>,
    scheduler: Arc<dyn Scheduler>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ReplaysEngine {
    /// Creates an engine with settings from `~/.smart-replays/`.
    pub fn new(host: Arc<dyn Host>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::with_storage(StorageConfig::default(), host, scheduler)
    }

    /// Creates an engine with custom storage. Used for testing with temp directories.
    ///
    /// Invalid alias entries in stored settings are skipped with a warning
    /// rather than disabling every alias.
    pub fn with_storage(
        storage: StorageConfig,
        host: Arc<dyn Host>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let settings = load_settings(&storage);
        let (aliases, _, rejected) = prune_invalid_aliases(settings.alias_values());
        if !rejected.is_empty() {
            tracing::warn!(count = rejected.len(), "Skipped invalid aliases from settings");
        }
        tracing::info!(aliases = aliases.len(), "Smart Replays engine ready");

        Self {
            storage,
            settings,
            aliases,
            tracker: ProcessTracker::new(),
            force_mode: ForceModeGate::new(),
            host,
            scheduler,
            notifier: None,
        }
    }

    pub fn set_notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifier = Some(notifier);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn tracker(&self) -> &ProcessTracker {
        &self.tracker
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Replaces and persists settings.
    ///
    /// The alias list must load in full; on failure nothing changes and the
    /// error carries the index of the entry to remove.
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        let aliases = settings.load_aliases()?;
        save_settings(&self.storage, &settings)?;
        self.aliases = aliases;
        self.settings = settings;
        tracing::info!(aliases = self.aliases.len(), "Settings updated");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────────

    /// Dispatches a host event. Returns a report for saved replays.
    pub fn handle_event(&mut self, event: HostEvent) -> Option<SaveReport> {
        tracing::debug!(?event, "Host event");
        match event {
            HostEvent::ReplayBufferStarted => {
                self.tracker.start_ring(self.host.buffer_max_seconds());
                self.scheduler.add_timer(TimerId::ClipHistory, SAMPLE_INTERVAL);
                if self.settings.restart_buffer_loop > 0 {
                    self.scheduler.add_timer(
                        TimerId::RestartLoop,
                        Duration::from_secs(self.settings.restart_buffer_loop),
                    );
                }
                None
            }
            HostEvent::ReplayBufferStopped => {
                self.scheduler.remove_timer(TimerId::ClipHistory);
                self.scheduler.remove_timer(TimerId::RestartLoop);
                self.tracker.stop_ring();
                self.force_mode.reset();
                None
            }
            HostEvent::ReplayBufferSaved => Some(self.on_replay_saved()),
            HostEvent::RecordingStarted => {
                self.tracker.start_counting();
                self.scheduler
                    .add_timer(TimerId::RecordingHistory, SAMPLE_INTERVAL);
                None
            }
            HostEvent::RecordingStopped => {
                self.scheduler.remove_timer(TimerId::RecordingHistory);
                self.tracker.stop_counting();
                None
            }
        }
    }

    /// Places the replay the host just saved, then restarts and notifies as configured.
    pub fn on_replay_saved(&self) -> SaveReport {
        let guard = self.force_mode.take();
        let forced_mode = guard.as_ref().map(|g| g.mode());

        let ctx = PlacementContext {
            host: self.host.as_ref(),
            settings: &self.settings,
            aliases: &self.aliases,
            tracker: &self.tracker,
        };
        let result = place_clip(forced_mode, &ctx);
        drop(guard);

        let restart_spawned = match &result {
            Ok(_) if self.settings.restart_buffer => {
                spawn_buffer_restart(self.host.clone()).is_some()
            }
            Ok(_) => false,
            Err(err) => {
                tracing::error!(error = %err, "Failed to place saved replay");
                false
            }
        };

        let saved_path = result.as_ref().ok().map(|clip| clip.path.as_path());
        let notification = plan_notification(saved_path, &self.settings.notifications);
        if let Some(notifier) = &self.notifier {
            notification.deliver(notifier.as_ref());
        }

        SaveReport {
            result,
            forced_mode,
            restart_spawned,
            notification,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Timers
    // ─────────────────────────────────────────────────────────────────────────────

    /// [`TimerId::ClipHistory`] callback.
    pub fn on_clip_history_tick(&mut self) {
        self.tracker.sample_ring(self.host.as_ref());
    }

    /// [`TimerId::RecordingHistory`] callback.
    pub fn on_recording_history_tick(&mut self) {
        self.tracker.sample_counting(self.host.as_ref());
    }

    /// [`TimerId::RestartLoop`] callback.
    ///
    /// After a restart the timer is not re-added here; the following
    /// [`HostEvent::ReplayBufferStarted`] arms it again.
    pub fn on_restart_loop_tick(&mut self) -> RestartDecision {
        self.scheduler.remove_timer(TimerId::RestartLoop);

        let decision = plan_restart(
            self.host.buffer_max_seconds(),
            self.host.seconds_since_last_input(),
        );
        match decision {
            RestartDecision::Postpone(delay) => {
                tracing::info!(delay_secs = delay.as_secs(), "User active, postponing buffer restart");
                self.scheduler.add_timer(TimerId::RestartLoop, delay);
            }
            RestartDecision::RestartNow => {
                spawn_buffer_restart(self.host.clone());
            }
        }
        decision
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Hotkeys
    // ─────────────────────────────────────────────────────────────────────────────

    /// Saves the buffer with `mode` instead of the configured one.
    pub fn trigger_forced_save(&self, mode: NamingMode) -> bool {
        self.force_mode.trigger(mode, self.host.as_ref())
    }

    /// Base name for a regular recording, using the counting history.
    pub fn recording_base_name(
        &self,
        mode: Option<NamingMode>,
    ) -> std::result::Result<String, LookupError> {
        let ctx = NamingContext {
            host: self.host.as_ref(),
            aliases: &self.aliases,
            tracker: &self.tracker,
            default_mode: self.settings.clips_naming_mode,
            capture: CaptureKind::Recording,
        };
        resolve_base_name(mode, &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AliasListItem;
    use crate::error::{AliasErrorKind, ReplaysError};
    use crate::test_utils::{FakeHost, RecordingScheduler};
    use std::path::PathBuf;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        temp: TempDir,
        host: Arc<FakeHost>,
        scheduler: Arc<RecordingScheduler>,
        engine: ReplaysEngine,
    }

    fn fixture() -> Fixture {
        let temp = tempdir().unwrap();
        let recordings = temp.path().join("recordings");
        std::fs::create_dir_all(&recordings).unwrap();

        let host = Arc::new(FakeHost::new());
        host.set_recording_dir(recordings);
        host.buffer_seconds.store(3, Ordering::SeqCst);
        let scheduler = Arc::new(RecordingScheduler::new());
        let storage = StorageConfig::with_root(temp.path().join("state"));
        let engine = ReplaysEngine::with_storage(storage, host.clone(), scheduler.clone());

        Fixture {
            temp,
            host,
            scheduler,
            engine,
        }
    }

    fn save_clip(fx: &Fixture) -> PathBuf {
        let clip = fx.temp.path().join("recordings").join("Replay.mkv");
        std::fs::write(&clip, b"clip").unwrap();
        fx.host.set_last_replay(Some(clip.clone()));
        clip
    }

    #[derive(Default)]
    struct CollectingNotifier {
        popups: Mutex<Vec<String>>,
    }

    impl Notifier for CollectingNotifier {
        fn play_sound(&self, _path: &std::path::Path) {}

        fn show_popup(&self, popup: &crate::notify::Popup) {
            self.popups.lock().unwrap().push(popup.title.clone());
        }
    }

    #[test]
    fn buffer_lifecycle_manages_timers_and_history() {
        let mut fx = fixture();
        fx.engine.handle_event(HostEvent::ReplayBufferStarted);
        assert_eq!(fx.scheduler.interval(TimerId::ClipHistory), Some(SAMPLE_INTERVAL));
        assert_eq!(fx.scheduler.interval(TimerId::RestartLoop), None);
        assert_eq!(fx.engine.tracker().ring().unwrap().capacity(), 3);

        fx.host.set_foreground(Some("/games/a.exe"));
        fx.engine.on_clip_history_tick();
        assert_eq!(fx.engine.tracker().ring().unwrap().len(), 1);

        fx.engine.handle_event(HostEvent::ReplayBufferStopped);
        assert_eq!(fx.scheduler.interval(TimerId::ClipHistory), None);
        assert!(fx.engine.tracker().ring().is_none());
    }

    #[test]
    fn restart_loop_timer_follows_settings() {
        let mut fx = fixture();
        let settings = Settings {
            restart_buffer_loop: 3600,
            ..fx.engine.settings().clone()
        };
        fx.engine.update_settings(settings).unwrap();

        fx.engine.handle_event(HostEvent::ReplayBufferStarted);
        assert_eq!(
            fx.scheduler.interval(TimerId::RestartLoop),
            Some(Duration::from_secs(3600))
        );
    }

    #[test]
    fn saved_replay_is_placed_with_most_recorded_process() {
        let mut fx = fixture();
        let settings = Settings {
            clips_naming_mode: NamingMode::MostRecordedProcess,
            clips_filename_template: "%NAME".to_string(),
            ..fx.engine.settings().clone()
        };
        fx.engine.update_settings(settings).unwrap();
        fx.engine.handle_event(HostEvent::ReplayBufferStarted);

        fx.host.set_foreground(Some("/games/game.exe"));
        fx.engine.on_clip_history_tick();
        fx.engine.on_clip_history_tick();
        fx.host.set_foreground(Some("/apps/browser.exe"));
        fx.engine.on_clip_history_tick();
        save_clip(&fx);

        let report = fx.engine.handle_event(HostEvent::ReplayBufferSaved).unwrap();
        let clip = report.result.unwrap();
        assert_eq!(clip.base_name, "game");
        assert_eq!(
            clip.path,
            fx.temp.path().join("recordings").join("game").join("game.mkv")
        );
        assert!(report.forced_mode.is_none());
        assert!(!report.restart_spawned);
    }

    #[test]
    fn forced_mode_applies_once_and_releases() {
        let mut fx = fixture();
        fx.host.set_scene("Ranked");
        fx.host.set_foreground(Some("/games/game.exe"));

        assert!(fx.engine.trigger_forced_save(NamingMode::CurrentScene));
        assert!(!fx.engine.trigger_forced_save(NamingMode::CurrentProcess));

        save_clip(&fx);
        let report = fx.engine.handle_event(HostEvent::ReplayBufferSaved).unwrap();
        assert_eq!(report.forced_mode, Some(NamingMode::CurrentScene));
        assert_eq!(report.result.unwrap().base_name, "Ranked");

        save_clip(&fx);
        let report = fx.engine.handle_event(HostEvent::ReplayBufferSaved).unwrap();
        assert_eq!(report.forced_mode, None);
        assert_eq!(report.result.unwrap().base_name, "game");
        assert!(fx.engine.trigger_forced_save(NamingMode::CurrentProcess));
    }

    #[test]
    fn forced_save_failure_still_releases_gate() {
        let mut fx = fixture();
        fx.host.set_foreground(None);
        assert!(fx.engine.trigger_forced_save(NamingMode::CurrentProcess));

        save_clip(&fx);
        let report = fx.engine.handle_event(HostEvent::ReplayBufferSaved).unwrap();
        assert!(report.result.is_err());
        assert!(fx.engine.trigger_forced_save(NamingMode::CurrentProcess));
    }

    #[test]
    fn failure_notification_is_delivered() {
        let mut fx = fixture();
        let notifier = Arc::new(CollectingNotifier::default());
        fx.engine.set_notifier(notifier.clone());
        let mut settings = fx.engine.settings().clone();
        settings.notifications.popup_on_failure = true;
        fx.engine.update_settings(settings).unwrap();

        fx.host.set_last_replay(None);
        let report = fx.engine.handle_event(HostEvent::ReplayBufferSaved).unwrap();
        assert!(report.result.is_err());
        assert_eq!(*notifier.popups.lock().unwrap(), vec!["Clip not saved".to_string()]);
    }

    #[test]
    fn restart_after_save_when_enabled() {
        let mut fx = fixture();
        let settings = Settings {
            restart_buffer: true,
            ..fx.engine.settings().clone()
        };
        fx.engine.update_settings(settings).unwrap();
        fx.host.set_foreground(Some("/games/game.exe"));
        save_clip(&fx);

        let report = fx.engine.handle_event(HostEvent::ReplayBufferSaved).unwrap();
        assert!(report.result.is_ok());
        assert!(report.restart_spawned);
    }

    #[test]
    fn invalid_alias_update_keeps_previous_table() {
        let mut fx = fixture();
        let good = Settings {
            custom_names_list: vec![AliasListItem::new("/games > Games")],
            ..fx.engine.settings().clone()
        };
        fx.engine.update_settings(good.clone()).unwrap();

        let bad = Settings {
            custom_names_list: vec![
                AliasListItem::new("/games > Games"),
                AliasListItem::new("/apps"),
            ],
            ..good.clone()
        };
        match fx.engine.update_settings(bad) {
            Err(ReplaysError::Alias(err)) => {
                assert_eq!(err.kind, AliasErrorKind::InvalidFormat);
                assert_eq!(err.index, 1);
            }
            other => panic!("expected alias error, got {:?}", other),
        }
        assert_eq!(fx.engine.settings(), &good);
        assert_eq!(fx.engine.aliases().len(), 1);
    }

    #[test]
    fn restart_loop_postpones_while_user_active() {
        let mut fx = fixture();
        fx.host.buffer_seconds.store(30, Ordering::SeqCst);
        fx.host.idle_seconds.store(5, Ordering::SeqCst);

        let decision = fx.engine.on_restart_loop_tick();
        assert_eq!(decision, RestartDecision::Postpone(Duration::from_secs(25)));
        assert_eq!(
            fx.scheduler.interval(TimerId::RestartLoop),
            Some(Duration::from_secs(25))
        );
    }

    #[test]
    fn restart_loop_restarts_when_idle() {
        let mut fx = fixture();
        fx.scheduler
            .add_timer(TimerId::RestartLoop, Duration::from_secs(60));

        assert_eq!(fx.engine.on_restart_loop_tick(), RestartDecision::RestartNow);
        assert_eq!(fx.scheduler.interval(TimerId::RestartLoop), None);
    }

    #[test]
    fn recording_history_names_recordings() {
        let mut fx = fixture();
        fx.engine.handle_event(HostEvent::RecordingStarted);
        assert_eq!(
            fx.scheduler.interval(TimerId::RecordingHistory),
            Some(SAMPLE_INTERVAL)
        );

        fx.host.set_foreground(Some("/apps/editor.exe"));
        fx.engine.on_recording_history_tick();
        fx.host.set_foreground(Some("/apps/other.exe"));

        let name = fx
            .engine
            .recording_base_name(Some(NamingMode::MostRecordedProcess))
            .unwrap();
        assert_eq!(name, "editor");

        fx.engine.handle_event(HostEvent::RecordingStopped);
        assert!(fx.engine.tracker().counter().is_none());
    }
}
