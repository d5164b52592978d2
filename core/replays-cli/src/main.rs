//! smart-replays: command-line front end for Smart Replays clip placement.
//!
//! Runs the same naming and placement logic the OBS plugin uses, against files
//! already on disk. Useful for scripting, for checking templates and aliases,
//! and for moving clips saved while the plugin was not loaded.
//!
//! ## Subcommands
//!
//! - `place`: Name and move a saved replay
//! - `preview` / `check-template`: Expand a filename template
//! - `resolve`: Show the base name an executable gets
//! - `check-aliases`: Validate (and optionally prune) the alias list
//! - `export-aliases` / `import-aliases`: Share alias lists
//! - `settings`: Print effective settings and warnings

mod cli_host;
mod commands;
mod logging;

use clap::{Parser, Subcommand};
use replays_core::{NamingMode, StorageConfig};
use std::path::PathBuf;

use crate::cli_host::Foreground;
use crate::commands::PlaceArgs;

#[derive(Parser)]
#[command(name = "smart-replays")]
#[command(about = "Smart Replays clip naming and placement")]
#[command(version)]
struct Cli {
    /// Settings root (default: ~/.smart-replays)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Name and move a saved replay
    Place {
        /// File the recorder just wrote
        #[arg(long, value_name = "PATH")]
        temp: PathBuf,

        /// Foreground executable at save time
        #[arg(long, value_name = "PATH", conflicts_with = "pid")]
        exe: Option<PathBuf>,

        /// Foreground process ID at save time
        #[arg(long)]
        pid: Option<u32>,

        /// Current scene name
        #[arg(long, default_value = "")]
        scene: String,

        /// Recorder output directory (default: folder of --temp)
        #[arg(long, value_name = "DIR")]
        recording_dir: Option<PathBuf>,

        /// Naming mode override: 1 process, 2 most recorded, 3 scene
        #[arg(long, value_parser = parse_mode)]
        mode: Option<NamingMode>,
    },

    /// Expand the filename template for a sample name
    Preview {
        #[arg(long, default_value = "clipname")]
        name: String,

        /// Template to expand instead of the configured one
        #[arg(long)]
        template: Option<String>,

        /// Fall back to the default template when the template is invalid
        #[arg(long)]
        fallback: bool,
    },

    /// Validate a filename template
    CheckTemplate {
        #[arg(value_name = "TEMPLATE")]
        template: String,
    },

    /// Show the base name an executable gets
    Resolve {
        #[arg(value_name = "PATH")]
        exe: PathBuf,
    },

    /// Validate the alias list
    CheckAliases {
        /// Remove invalid entries and save
        #[arg(long)]
        prune: bool,
    },

    /// Write the alias list into a folder
    ExportAliases {
        #[arg(value_name = "DIR")]
        folder: PathBuf,
    },

    /// Replace the alias list with an exported one
    ImportAliases {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print effective settings
    Settings {
        /// Also check paths against this recording directory
        #[arg(long, value_name = "DIR")]
        recording_dir: Option<PathBuf>,
    },
}

fn parse_mode(value: &str) -> Result<NamingMode, String> {
    let raw: i64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    NamingMode::try_from(raw).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    let storage = cli
        .root
        .clone()
        .map(StorageConfig::with_root)
        .unwrap_or_default();
    let _logging_guard = logging::init(&storage);

    if let Err(e) = run(cli.command, storage) {
        tracing::error!(error = %e, "smart-replays failed");
        std::process::exit(1);
    }
}

fn run(command: Commands, storage: StorageConfig) -> commands::CliResult<()> {
    match command {
        Commands::Place {
            temp,
            exe,
            pid,
            scene,
            recording_dir,
            mode,
        } => {
            let foreground = match (exe, pid) {
                (Some(path), _) => Foreground::Executable(path),
                (None, Some(pid)) => Foreground::Pid(pid),
                (None, None) => Foreground::None,
            };
            let clip = commands::place(
                storage,
                PlaceArgs {
                    temp_path: temp,
                    foreground,
                    scene,
                    recording_dir,
                    mode,
                },
            )?;
            println!("{}", clip.path.display());
            if let Some(Ok(link)) = &clip.link {
                println!("{}", link.display());
            }
        }
        Commands::Preview {
            name,
            template,
            fallback,
        } => {
            let filename = commands::preview(&storage, &name, template.as_deref(), fallback)?;
            println!("{}", filename);
        }
        Commands::CheckTemplate { template } => {
            println!("{}", commands::check_template_cmd(&template)?);
        }
        Commands::Resolve { exe } => {
            println!("{}", commands::resolve_name(&storage, &exe)?);
        }
        Commands::CheckAliases { prune } => {
            let count = commands::check_aliases(&storage, prune)?;
            println!("{} aliases OK", count);
        }
        Commands::ExportAliases { folder } => {
            println!("{}", commands::export(&storage, &folder)?.display());
        }
        Commands::ImportAliases { file } => {
            let count = commands::import(&storage, &file)?;
            println!("Imported {} aliases", count);
        }
        Commands::Settings { recording_dir } => {
            println!("{}", commands::show_settings(&storage)?);
            if let Some(dir) = recording_dir {
                for warning in commands::settings_warnings(&storage, &dir) {
                    eprintln!("warning: {}", warning);
                }
            }
        }
    }
    Ok(())
}
