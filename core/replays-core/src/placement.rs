//! Moving a freshly saved replay into its final, named location.
//!
//! ```text
//! host temp path ─┐
//! base name ──────┼─→ template ─→ <base>[/<name>]/<file>.<ext> ─→ unique ─→ rename ─→ [hard link]
//! settings ───────┘
//! ```
//!
//! Every step before the rename aborts the placement and leaves the temporary
//! file untouched. The rename requires the destination to be on the same volume
//! as the host's recording directory. The optional hard link runs after a
//! successful move and its failure is reported alongside the placed clip.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use fs_err as fs;

use crate::aliases::AliasTable;
use crate::config::Settings;
use crate::error::{LinkError, PlacementError, TemplateError};
use crate::host::Host;
use crate::naming::{resolve_base_name, CaptureKind, NamingContext};
use crate::path_utils::extension_lossy;
use crate::patterns::{contains_any, FILENAME_PROHIBITED_CHARS};
use crate::template::expand_filename;
use crate::tracker::ProcessTracker;
use crate::types::{NamingMode, PlacedClip};
use crate::unique::ensure_unique;

/// Everything a placement reads.
pub struct PlacementContext<'a> {
    pub host: &'a dyn Host,
    pub settings: &'a Settings,
    pub aliases: &'a AliasTable,
    pub tracker: &'a ProcessTracker,
}

/// Places the host's last saved replay, timestamped now.
pub fn place_clip(
    mode: Option<NamingMode>,
    ctx: &PlacementContext<'_>,
) -> Result<PlacedClip, PlacementError> {
    place_clip_at(mode, ctx, &Local::now())
}

/// Places the host's last saved replay using `timestamp` for the template.
pub fn place_clip_at<Tz>(
    mode: Option<NamingMode>,
    ctx: &PlacementContext<'_>,
    timestamp: &DateTime<Tz>,
) -> Result<PlacedClip, PlacementError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let temp_path = ctx
        .host
        .last_replay_path()
        .ok_or(PlacementError::MissingTempPath)?;
    tracing::info!(path = %temp_path.display(), "Placing saved replay");

    let naming = NamingContext {
        host: ctx.host,
        aliases: ctx.aliases,
        tracker: ctx.tracker,
        default_mode: ctx.settings.clips_naming_mode,
        capture: CaptureKind::ReplayBuffer,
    };
    let base_name = resolve_base_name(mode, &naming)?;

    let mut filename = expand_filename(&base_name, &ctx.settings.clips_filename_template, timestamp)?;
    if let Some(ext) = extension_lossy(&temp_path) {
        filename.push('.');
        filename.push_str(&ext);
    }

    let mut folder = ctx
        .settings
        .clips_base_path_or(&ctx.host.recording_directory());
    if ctx.settings.clips_save_to_folder {
        // The name becomes a directory, so it must be a single valid component.
        if !is_single_component(&base_name) || contains_any(&base_name, FILENAME_PROHIBITED_CHARS) {
            return Err(TemplateError::ProhibitedCharacters {
                filename: base_name,
            }
            .into());
        }
        folder.push(&base_name);
    }

    fs::create_dir_all(&folder).map_err(|source| PlacementError::CreateDir {
        path: folder.clone(),
        source,
    })?;

    let final_path = ensure_unique(&folder.join(&filename));
    fs::rename(&temp_path, &final_path).map_err(|source| PlacementError::Rename {
        from: temp_path.clone(),
        to: final_path.clone(),
        source,
    })?;
    tracing::info!(name = %base_name, path = %final_path.display(), "Clip moved");

    let link = if ctx.settings.clips_create_links {
        let result = create_hard_link(&final_path, ctx.settings.clips_links_folder_path.as_deref());
        match &result {
            Ok(link) => tracing::info!(link = %link.display(), "Clip link created"),
            Err(err) => tracing::warn!(error = %err, "Clip link failed"),
        }
        Some(result)
    } else {
        None
    };

    Ok(PlacedClip {
        base_name,
        path: final_path,
        link,
    })
}

/// True when `name` is one plain path component (not empty, `.` or `..`).
fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Hard-links `target` into `links_folder` under the same (deduplicated) file name.
pub fn create_hard_link(target: &Path, links_folder: Option<&Path>) -> Result<PathBuf, LinkError> {
    let folder = links_folder
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(LinkError::NoLinksFolder)?;

    fs::create_dir_all(folder).map_err(|source| LinkError::CreateDir {
        path: folder.to_path_buf(),
        source,
    })?;

    let file_name = target.file_name().unwrap_or_default();
    let link = ensure_unique(&folder.join(file_name));
    fs::hard_link(target, &link).map_err(|source| LinkError::HardLink {
        target: target.to_path_buf(),
        link: link.clone(),
        source,
    })?;
    Ok(link)
}
