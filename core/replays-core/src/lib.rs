//! # replays-core
//!
//! Core library for Smart Replays, the clip naming and placement engine behind
//! the OBS replay buffer plugin.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. The only background work is the
//!   buffer restart, which runs on its own thread.
//! - **Host-agnostic**: Everything OBS or the OS provides goes through the
//!   [`Host`], [`Scheduler`] and [`Notifier`] traits.
//! - **Fail before moving**: A clip is only renamed once its base name, file name
//!   and folder are all valid. Any earlier failure leaves the host's file alone.
//! - **Not thread-safe**: Hosts provide their own synchronization around
//!   [`ReplaysEngine`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use replays_core::{HostEvent, ReplaysEngine};
//!
//! let mut engine = ReplaysEngine::new(host, scheduler);
//! engine.handle_event(HostEvent::ReplayBufferStarted);
//! if let Some(report) = engine.handle_event(HostEvent::ReplayBufferSaved) {
//!     println!("{:?}", report.result);
//! }
//! ```

// Public modules
pub mod aliases;
pub mod config;
pub mod engine;
pub mod error;
pub mod force_mode;
pub mod host;
pub mod naming;
pub mod notify;
pub mod path_utils;
pub mod patterns;
pub mod placement;
pub mod restart;
pub mod storage;
pub mod template;
pub mod tracker;
pub mod types;
pub mod unique;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used items at crate root
pub use aliases::{prune_invalid_aliases, AliasEntry, AliasTable, RejectedAlias, ALIAS_SEPARATOR};
pub use config::*;
pub use engine::{HostEvent, ReplaysEngine, SaveReport};
pub use error::{
    AliasError, AliasErrorKind, LinkError, LookupError, PlacementError, ReplaysError, Result,
    TemplateError,
};
pub use force_mode::{ForceModeGate, ForceModeGuard};
pub use host::{executable_for_pid, Host, Scheduler, TimerId};
pub use naming::{name_for_executable, resolve_base_name, CaptureKind, NamingContext};
pub use notify::{plan_notification, NotificationPlan, Notifier, Popup};
pub use placement::{create_hard_link, place_clip, place_clip_at, PlacementContext};
pub use restart::{plan_restart, restart_replay_buffer, spawn_buffer_restart, RestartDecision};
pub use storage::*;
pub use template::{
    check_template, expand_filename, expand_or_default, DEFAULT_FILENAME_TEMPLATE,
    NAME_PLACEHOLDER,
};
pub use tracker::{CountingHistory, ProcessTracker, RingHistory};
pub use types::*;
pub use unique::ensure_unique;
