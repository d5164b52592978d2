//! Base-name resolution: what a clip is named after, before the filename template.

use std::path::PathBuf;

use crate::aliases::AliasTable;
use crate::error::LookupError;
use crate::host::Host;
use crate::path_utils::file_stem_lossy;
use crate::tracker::ProcessTracker;
use crate::types::NamingMode;

/// Which session's history answers "most recorded process".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// Replay buffer clip: ring history.
    ReplayBuffer,
    /// Regular recording: counting history.
    Recording,
}

/// Everything the resolver reads. Borrowed from the engine for one resolution.
pub struct NamingContext<'a> {
    pub host: &'a dyn Host,
    pub aliases: &'a AliasTable,
    pub tracker: &'a ProcessTracker,
    /// Mode from settings, used when no mode is forced.
    pub default_mode: NamingMode,
    pub capture: CaptureKind,
}

/// Resolves a clip's base name.
///
/// `mode` is a forced override (hotkey); `None` uses the configured mode.
/// Lookup failures are returned as-is: a clip is never silently named by a
/// different mode.
pub fn resolve_base_name(
    mode: Option<NamingMode>,
    ctx: &NamingContext<'_>,
) -> Result<String, LookupError> {
    let mode = mode.unwrap_or(ctx.default_mode);
    tracing::debug!(?mode, capture = ?ctx.capture, "Resolving clip name");

    let executable = match mode {
        NamingMode::CurrentScene => return Ok(ctx.host.current_scene_name()),
        NamingMode::CurrentProcess => ctx.host.foreground_executable()?,
        NamingMode::MostRecordedProcess => match most_recorded(ctx) {
            Some(path) => path,
            None => ctx.host.foreground_executable()?,
        },
    };

    Ok(name_for_executable(&executable, ctx.aliases))
}

fn most_recorded(ctx: &NamingContext<'_>) -> Option<PathBuf> {
    let path = match ctx.capture {
        CaptureKind::ReplayBuffer => ctx.tracker.ring()?.most_recorded(),
        CaptureKind::Recording => ctx.tracker.counter()?.most_recorded(),
    };
    path.map(|p| p.to_path_buf())
}

/// Alias for the executable, falling back to its file stem.
pub fn name_for_executable(executable: &std::path::Path, aliases: &AliasTable) -> String {
    match aliases.resolve(executable) {
        Some(name) => name.to_string(),
        None => {
            let stem = file_stem_lossy(executable);
            tracing::debug!(path = %executable.display(), name = %stem, "Using executable name");
            stem
        }
    }
}
