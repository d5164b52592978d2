//! Error types for replays-core operations.
//!
//! Alias and template validation return their own small error types so the
//! settings UI can react to the exact failure (and, for aliases, the offending
//! entry index). Everything else funnels into [`ReplaysError`].

use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════════════
// Alias Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Why an alias entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasErrorKind {
    /// No `>` separator, or one of the halves is empty.
    InvalidFormat,
    /// The path or the name contains a prohibited character.
    InvalidCharacters,
    /// Another entry already uses the same path.
    PathAlreadyExists,
}

/// A rejected alias list, pointing at the entry that has to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Alias entry #{index} is invalid: {kind:?}")]
pub struct AliasError {
    pub kind: AliasErrorKind,
    pub index: usize,
}

impl AliasError {
    pub fn new(kind: AliasErrorKind, index: usize) -> Self {
        Self { kind, index }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Template Errors
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Filename template is empty")]
    EmptyTemplate,

    #[error("Filename template has a malformed time directive: {template}")]
    ExpansionError { template: String },

    #[error("Expanded file name contains prohibited characters: {filename}")]
    ProhibitedCharacters { filename: String },
}

// ═══════════════════════════════════════════════════════════════════════════════
// Lookup Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Failure to identify the foreground process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("No active window")]
    NoActiveProcess,

    #[error("Cannot get executable path for process {pid}")]
    ProcessInaccessible { pid: u32 },
}

// ═══════════════════════════════════════════════════════════════════════════════
// Placement Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// A failed clip placement. The temporary clip is left where the host put it.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("Host did not report a saved replay path")]
    MissingTempPath,

    #[error("Cannot resolve clip name: {0}")]
    BaseName(#[from] LookupError),

    #[error("Cannot build clip file name: {0}")]
    Template(#[from] TemplateError),

    #[error("Cannot create clip folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot move {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A failed hard link next to an already placed clip.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("Links folder is not configured")]
    NoLinksFolder,

    #[error("Cannot create links folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot link {target} as {link}: {source}")]
    HardLink {
        target: PathBuf,
        link: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// Crate Error
// ═══════════════════════════════════════════════════════════════════════════════

/// All errors that can occur in replays-core operations.
#[derive(Debug, thiserror::Error)]
pub enum ReplaysError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error(transparent)]
    Alias(#[from] AliasError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Settings write failed: {path}: {source}")]
    SettingsWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown naming mode: {0}")]
    UnknownNamingMode(i64),

    // ─────────────────────────────────────────────────────────────────────
    // Runtime Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using ReplaysError.
pub type Result<T> = std::result::Result<T, ReplaysError>;
