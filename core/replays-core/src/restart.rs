//! Replay buffer restarts.
//!
//! The host's stop/start calls can hang when issued from its own event
//! callback, so restarts always run on a separate thread and the caller never
//! waits for them.
//!
//! The periodic restart loop postpones itself while the user is active, so a
//! restart never throws away footage the user might still want to save.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::host::Host;

/// Shortest delay before the restart loop checks again.
pub const MIN_RESTART_DELAY: Duration = Duration::from_secs(2);

const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);
const STOP_TIMEOUT: Duration = Duration::from_secs(30);

/// What the restart loop should do on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartDecision {
    /// The buffer still holds recent activity; check again later.
    Postpone(Duration),
    RestartNow,
}

/// Decides whether a periodic restart can happen now.
///
/// Restarting is safe once the user has been idle for at least the buffer
/// length. Otherwise the check is pushed back by the remaining time.
pub fn plan_restart(buffer_seconds: u32, idle_seconds: u64) -> RestartDecision {
    let buffer_seconds = u64::from(buffer_seconds);
    if idle_seconds >= buffer_seconds {
        return RestartDecision::RestartNow;
    }

    let remaining = Duration::from_secs(buffer_seconds - idle_seconds);
    RestartDecision::Postpone(remaining.max(MIN_RESTART_DELAY))
}

/// Stops the buffer, waits until it can capture again, then starts it. Blocking.
pub fn restart_replay_buffer(host: &dyn Host) -> bool {
    tracing::info!("Stopping replay buffer");
    host.stop_replay_buffer();

    let started = Instant::now();
    while !host.can_begin_capture() {
        if started.elapsed() >= STOP_TIMEOUT {
            tracing::error!(
                waited_secs = STOP_TIMEOUT.as_secs(),
                "Replay buffer did not stop, giving up restart"
            );
            return false;
        }
        thread::sleep(STOP_POLL_INTERVAL);
    }

    tracing::info!("Starting replay buffer");
    host.start_replay_buffer();
    true
}

/// Restarts the buffer on a background thread.
pub fn spawn_buffer_restart(host: Arc<dyn Host>) -> Option<JoinHandle<bool>> {
    let spawned = thread::Builder::new()
        .name("replay-buffer-restart".to_string())
        .spawn(move || restart_replay_buffer(host.as_ref()));

    match spawned {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::error!(error = %err, "Failed to spawn replay buffer restart");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeHost;
    use std::sync::atomic::Ordering;

    #[test]
    fn restarts_when_idle_longer_than_buffer() {
        assert_eq!(plan_restart(30, 30), RestartDecision::RestartNow);
        assert_eq!(plan_restart(30, 120), RestartDecision::RestartNow);
    }

    #[test]
    fn postpones_by_remaining_buffer_time() {
        assert_eq!(
            plan_restart(30, 10),
            RestartDecision::Postpone(Duration::from_secs(20))
        );
    }

    #[test]
    fn postpone_has_minimum_delay() {
        assert_eq!(plan_restart(30, 29), RestartDecision::Postpone(MIN_RESTART_DELAY));
    }

    #[test]
    fn restart_stops_then_starts() {
        let host = FakeHost::new();
        assert!(restart_replay_buffer(&host));
        assert_eq!(host.stops.load(Ordering::SeqCst), 1);
        assert_eq!(host.starts.load(Ordering::SeqCst), 1);
        assert!(host.replay_buffer_active());
    }

    #[test]
    fn spawned_restart_runs_off_thread() {
        let host = Arc::new(FakeHost::new());
        let handle = spawn_buffer_restart(host.clone()).unwrap();
        assert!(handle.join().unwrap());
        assert_eq!(host.starts.load(Ordering::SeqCst), 1);
    }
}
