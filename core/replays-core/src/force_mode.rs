//! Hotkey-forced naming mode for the next saved clip.
//!
//! A trigger claims the gate, remembers the mode and asks the host to save.
//! The save handler later takes a [`ForceModeGuard`] for that mode; dropping the
//! guard reopens the gate, whether the placement succeeded or not. Triggers
//! that arrive while the gate is claimed are skipped, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::host::Host;
use crate::types::NamingMode;

#[derive(Debug, Default)]
pub struct ForceModeGate {
    busy: AtomicBool,
    pending: Mutex<Option<NamingMode>>,
}

impl ForceModeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a save named with `mode`. Returns false when skipped.
    pub fn trigger(&self, mode: NamingMode, host: &dyn Host) -> bool {
        if !host.replay_buffer_active() {
            tracing::debug!(?mode, "Replay buffer inactive, ignoring forced save");
            return false;
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(?mode, "Forced save already in flight, skipping");
            return false;
        }

        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(mode);
        tracing::info!(?mode, "Forced save requested");
        host.save_replay_buffer();
        true
    }

    /// Takes the forced mode for the save being handled, if one was requested.
    pub fn take(&self) -> Option<ForceModeGuard<'_>> {
        let mode = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        Some(ForceModeGuard { gate: self, mode })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Drops a request whose save never arrived (e.g. the buffer stopped).
    pub fn reset(&self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.busy.store(false, Ordering::Release);
    }
}

/// Claim on the gate for one in-flight forced save. Releases on drop.
#[derive(Debug)]
pub struct ForceModeGuard<'a> {
    gate: &'a ForceModeGate,
    mode: NamingMode,
}

impl ForceModeGuard<'_> {
    pub fn mode(&self) -> NamingMode {
        self.mode
    }
}

impl Drop for ForceModeGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeHost;

    #[test]
    fn trigger_requests_save_and_take_releases() {
        let host = FakeHost::new();
        let gate = ForceModeGate::new();

        assert!(gate.trigger(NamingMode::CurrentScene, &host));
        assert_eq!(host.save_requests.load(Ordering::SeqCst), 1);
        assert!(gate.is_busy());

        {
            let guard = gate.take().unwrap();
            assert_eq!(guard.mode(), NamingMode::CurrentScene);
            assert!(gate.is_busy());
        }
        assert!(!gate.is_busy());
        assert!(gate.take().is_none());
    }

    #[test]
    fn overlapping_trigger_is_skipped() {
        let host = FakeHost::new();
        let gate = ForceModeGate::new();

        assert!(gate.trigger(NamingMode::CurrentScene, &host));
        assert!(!gate.trigger(NamingMode::CurrentProcess, &host));
        assert_eq!(host.save_requests.load(Ordering::SeqCst), 1);
        assert_eq!(gate.take().unwrap().mode(), NamingMode::CurrentScene);

        assert!(gate.trigger(NamingMode::CurrentProcess, &host));
    }

    #[test]
    fn inactive_buffer_is_ignored() {
        let host = FakeHost::new();
        host.buffer_active.store(false, Ordering::SeqCst);
        let gate = ForceModeGate::new();

        assert!(!gate.trigger(NamingMode::CurrentScene, &host));
        assert!(!gate.is_busy());
        assert_eq!(host.save_requests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reset_unblocks_lost_request() {
        let host = FakeHost::new();
        let gate = ForceModeGate::new();
        gate.trigger(NamingMode::CurrentScene, &host);

        gate.reset();
        assert!(!gate.is_busy());
        assert!(gate.take().is_none());
    }
}
