//! Foreground process history.
//!
//! Two histories are collected on a 1-second tick, each tied to its own host session:
//!
//! - [`RingHistory`] while the replay buffer runs. Holds at most one sample per
//!   second of buffer length, newest first, so it covers exactly what a saved
//!   clip contains.
//! - [`CountingHistory`] while a regular recording runs. Counts seconds per
//!   executable for the whole recording.
//!
//! A history only exists between its session's start and stop events. A tick
//! whose foreground lookup fails is skipped.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use crate::host::Host;

// ═══════════════════════════════════════════════════════════════════════════════
// Ring History
// ═══════════════════════════════════════════════════════════════════════════════

/// Fixed-capacity, most-recent-first sample buffer.
#[derive(Debug, Clone)]
pub struct RingHistory {
    samples: VecDeque<PathBuf>,
    capacity: usize,
}

impl RingHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes a sample to the front, evicting the oldest one when full.
    pub fn push(&mut self, path: PathBuf) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_back();
        }
        self.samples.push_front(path);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.samples.iter().map(PathBuf::as_path)
    }

    /// Executable with the most samples.
    ///
    /// Ties go to the executable that was seen most recently.
    pub fn most_recorded(&self) -> Option<&Path> {
        let mut counts: HashMap<&Path, (usize, usize)> = HashMap::new();
        for (position, path) in self.samples.iter().enumerate() {
            counts.entry(path.as_path()).or_insert((0, position)).0 += 1;
        }

        counts
            .into_iter()
            .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
                count_a.cmp(count_b).then(first_b.cmp(first_a))
            })
            .map(|(path, _)| path)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Counting History
// ═══════════════════════════════════════════════════════════════════════════════

/// Seconds each executable spent in the foreground.
#[derive(Debug, Clone, Default)]
pub struct CountingHistory {
    counts: HashMap<PathBuf, u64>,
}

impl CountingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: PathBuf) {
        *self.counts.entry(path).or_insert(0) += 1;
    }

    pub fn count(&self, path: &Path) -> u64 {
        self.counts.get(path).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Executable with the highest count. Ties go to the smallest path.
    pub fn most_recorded(&self) -> Option<&Path> {
        self.counts
            .iter()
            .max_by(|(path_a, count_a), (path_b, count_b)| {
                count_a.cmp(count_b).then_with(|| path_b.cmp(path_a))
            })
            .map(|(path, _)| path.as_path())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tracker
// ═══════════════════════════════════════════════════════════════════════════════

/// Owns both histories and their session lifecycles.
#[derive(Debug, Default)]
pub struct ProcessTracker {
    ring: Option<RingHistory>,
    counter: Option<CountingHistory>,
}

impl ProcessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay buffer started: fresh ring sized to the buffer length.
    pub fn start_ring(&mut self, buffer_max_seconds: u32) {
        self.ring = Some(RingHistory::with_capacity(buffer_max_seconds as usize));
        tracing::info!(capacity = buffer_max_seconds, "Process history started");
    }

    pub fn stop_ring(&mut self) {
        if self.ring.take().is_some() {
            tracing::info!("Process history discarded");
        }
    }

    /// Recording started: fresh counter.
    pub fn start_counting(&mut self) {
        self.counter = Some(CountingHistory::new());
    }

    pub fn stop_counting(&mut self) {
        self.counter = None;
    }

    pub fn ring(&self) -> Option<&RingHistory> {
        self.ring.as_ref()
    }

    pub fn counter(&self) -> Option<&CountingHistory> {
        self.counter.as_ref()
    }

    /// Ring tick. No-op outside a buffer session or when the lookup fails.
    pub fn sample_ring(&mut self, host: &dyn Host) {
        let Some(ring) = self.ring.as_mut() else {
            return;
        };
        match host.foreground_executable() {
            Ok(path) => ring.push(path),
            Err(err) => tracing::trace!(error = %err, "Skipping process sample"),
        }
    }

    /// Counting tick. No-op outside a recording or when the lookup fails.
    pub fn sample_counting(&mut self, host: &dyn Host) {
        let Some(counter) = self.counter.as_mut() else {
            return;
        };
        match host.foreground_executable() {
            Ok(path) => counter.record(path),
            Err(err) => tracing::trace!(error = %err, "Skipping process sample"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeHost;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn ring_evicts_oldest_sample() {
        let mut ring = RingHistory::with_capacity(3);
        for name in ["A", "B", "C", "D"] {
            ring.push(p(name));
        }
        let contents: Vec<_> = ring.iter().collect();
        assert_eq!(contents, vec![Path::new("D"), Path::new("C"), Path::new("B")]);
    }

    #[test]
    fn zero_capacity_ring_stays_empty() {
        let mut ring = RingHistory::with_capacity(0);
        ring.push(p("A"));
        assert!(ring.is_empty());
        assert_eq!(ring.most_recorded(), None);
    }

    #[test]
    fn ring_most_recorded_picks_highest_count() {
        let mut ring = RingHistory::with_capacity(20);
        for _ in 0..5 {
            ring.push(p("A"));
        }
        for _ in 0..9 {
            ring.push(p("B"));
        }
        assert_eq!(ring.most_recorded(), Some(Path::new("B")));
    }

    #[test]
    fn ring_tie_goes_to_most_recent() {
        let mut ring = RingHistory::with_capacity(10);
        ring.push(p("A"));
        ring.push(p("B"));
        ring.push(p("A"));
        ring.push(p("B"));
        assert_eq!(ring.most_recorded(), Some(Path::new("B")));
    }

    #[test]
    fn counter_tie_goes_to_smallest_path() {
        let mut counter = CountingHistory::new();
        counter.record(p("/b"));
        counter.record(p("/a"));
        assert_eq!(counter.most_recorded(), Some(Path::new("/a")));
        counter.record(p("/b"));
        assert_eq!(counter.most_recorded(), Some(Path::new("/b")));
        assert_eq!(counter.count(Path::new("/b")), 2);
    }

    #[test]
    fn histories_are_none_before_start_and_after_stop() {
        let host = FakeHost::new();
        host.set_foreground(Some("/games/a.exe"));
        let mut tracker = ProcessTracker::new();

        tracker.sample_ring(&host);
        tracker.sample_counting(&host);
        assert!(tracker.ring().is_none());
        assert!(tracker.counter().is_none());

        tracker.start_ring(10);
        tracker.start_counting();
        tracker.sample_ring(&host);
        tracker.sample_counting(&host);
        assert_eq!(tracker.ring().unwrap().len(), 1);
        assert_eq!(tracker.counter().unwrap().count(Path::new("/games/a.exe")), 1);

        tracker.stop_ring();
        tracker.stop_counting();
        assert!(tracker.ring().is_none());
        assert!(tracker.counter().is_none());

        tracker.start_ring(10);
        assert!(tracker.ring().unwrap().is_empty());
    }

    #[test]
    fn failed_lookup_is_a_noop() {
        let host = FakeHost::new();
        host.set_foreground(None);
        let mut tracker = ProcessTracker::new();
        tracker.start_ring(5);
        tracker.start_counting();

        tracker.sample_ring(&host);
        tracker.sample_counting(&host);

        assert!(tracker.ring().unwrap().is_empty());
        assert!(tracker.counter().unwrap().is_empty());
    }
}
