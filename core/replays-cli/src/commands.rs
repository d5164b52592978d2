//! Subcommand implementations.
//!
//! Each command takes parsed arguments plus the storage root and returns a
//! [`CliError`] instead of exiting, so they can be tested against temp dirs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use replays_core::{
    check_template, expand_filename, expand_or_default, export_aliases, import_aliases,
    load_settings, name_for_executable, prune_invalid_aliases, save_settings, AliasListItem,
    NamingMode, PlacedClip, ReplaysEngine, ReplaysError, Settings, StorageConfig,
    TemplateError,
};
use thiserror::Error;

use crate::cli_host::{ArgsHost, Foreground, NoTimers, StderrNotifier};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Replays(#[from] ReplaysError),

    #[error("Clip not placed: {0}")]
    Placement(#[from] replays_core::PlacementError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("{count} invalid alias entries")]
    InvalidAliases { count: usize },
}

pub type CliResult<T> = Result<T, CliError>;

/// Arguments of `place`.
#[derive(Debug, Clone)]
pub struct PlaceArgs {
    pub temp_path: PathBuf,
    pub foreground: Foreground,
    pub scene: String,
    pub recording_dir: Option<PathBuf>,
    pub mode: Option<NamingMode>,
}

/// Moves a saved replay into place, exactly as a buffer save inside the host would.
pub fn place(storage: StorageConfig, args: PlaceArgs) -> CliResult<PlacedClip> {
    let recording_dir = args.recording_dir.clone().unwrap_or_else(|| {
        args.temp_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    let host = Arc::new(ArgsHost {
        temp_path: args.temp_path,
        foreground: args.foreground,
        scene: args.scene,
        recording_dir,
    });

    let mut engine = ReplaysEngine::with_storage(storage, host, Arc::new(NoTimers));
    engine.set_notifier(Arc::new(StderrNotifier));

    if let Some(mode) = args.mode {
        engine.trigger_forced_save(mode);
    }

    let clip = engine.on_replay_saved().result?;

    if let Some(Err(err)) = &clip.link {
        tracing::warn!(error = %err, "Clip placed without link");
    }
    Ok(clip)
}

/// Expands the configured (or given) template for a sample name.
pub fn preview(
    storage: &StorageConfig,
    name: &str,
    template: Option<&str>,
    fallback: bool,
) -> CliResult<String> {
    let settings = load_settings(storage);
    let template = template.unwrap_or(&settings.clips_filename_template);
    let now = Local::now();

    let filename = if fallback {
        expand_or_default(name, template, &now)?
    } else {
        expand_filename(name, template, &now)?
    };
    Ok(filename)
}

pub fn check_template_cmd(template: &str) -> CliResult<String> {
    Ok(check_template(template)?)
}

/// Base name an executable would get with the stored alias list.
pub fn resolve_name(storage: &StorageConfig, executable: &Path) -> CliResult<String> {
    let settings = load_settings(storage);
    let aliases = settings.load_aliases().map_err(ReplaysError::from)?;
    Ok(name_for_executable(executable, &aliases))
}

/// Validates the stored alias list. With `prune`, invalid entries are removed
/// and the list is saved.
pub fn check_aliases(storage: &StorageConfig, prune: bool) -> CliResult<usize> {
    let mut settings = load_settings(storage);
    let (table, _, rejected) = prune_invalid_aliases(settings.alias_values());

    for entry in &rejected {
        eprintln!("{}: {}", entry.error, entry.raw);
    }

    if rejected.is_empty() {
        return Ok(table.len());
    }
    if !prune {
        return Err(CliError::InvalidAliases {
            count: rejected.len(),
        });
    }

    // Indices refer to the list as it was when each entry was dropped.
    for entry in &rejected {
        settings.custom_names_list.remove(entry.error.index);
    }
    save_settings(storage, &settings)?;
    tracing::info!(removed = rejected.len(), "Pruned alias list saved");
    Ok(table.len())
}

pub fn export(storage: &StorageConfig, folder: &Path) -> CliResult<PathBuf> {
    let settings = load_settings(storage);
    Ok(export_aliases(folder, &settings.custom_names_list)?)
}

/// Replaces the stored alias list with an exported one. The list must load in full.
pub fn import(storage: &StorageConfig, file: &Path) -> CliResult<usize> {
    let items: Vec<AliasListItem> = import_aliases(file)?;
    let settings = Settings {
        custom_names_list: items,
        ..load_settings(storage)
    };

    let table = settings.load_aliases().map_err(ReplaysError::from)?;
    save_settings(storage, &settings)?;
    Ok(table.len())
}

/// Pretty JSON of the effective settings.
pub fn show_settings(storage: &StorageConfig) -> CliResult<String> {
    let settings = load_settings(storage);
    let json = serde_json::to_string_pretty(&settings).map_err(|source| ReplaysError::Json {
        context: "serialize settings".to_string(),
        source,
    })?;
    Ok(json)
}

/// Human-readable settings warnings for a recording directory.
pub fn settings_warnings(storage: &StorageConfig, recording_dir: &Path) -> Vec<String> {
    load_settings(storage)
        .validate(recording_dir)
        .iter()
        .map(|warning| format!("{:?}", warning))
        .collect()
}
