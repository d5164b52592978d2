//! Alias table: friendly clip names for executables and the folders containing them.
//!
//! Aliases are edited by the user as an ordered list of `"path > name"` strings.
//! The list is parsed all-or-nothing: the first invalid entry rejects the whole
//! list and its index is reported so the settings UI can drop exactly that entry.
//!
//! # Resolution
//!
//! An executable matches an alias whose path is the executable itself or any of
//! its ancestor directories. When several aliases enclose the executable, the
//! most specific one (the nearest ancestor) wins:
//!
//! ```text
//! C:\Games           > Games
//! C:\Games\Steam     > Steam
//! C:\Games\Steam\cs2.exe          → "Steam"
//! C:\Games\Epic\fortnite.exe      → "Games"
//! ```
//!
//! The search walks the executable's ancestors, so the result never depends on
//! the order of the list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AliasError, AliasErrorKind};
use crate::path_utils::normalize_path_for_matching;
use crate::patterns::{
    contains_any, expand_env_vars, expand_env_vars_with, FILENAME_PROHIBITED_CHARS,
    PATH_PROHIBITED_CHARS,
};

/// Separator between the path and the name of a raw alias entry.
pub const ALIAS_SEPARATOR: char = '>';

/// One validated alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    /// Path as written by the user, with environment variables expanded.
    pub path_prefix: PathBuf,
    pub display_name: String,
}

impl AliasEntry {
    /// Raw `"path > name"` form, suitable for the settings list.
    pub fn to_raw(&self) -> String {
        format!(
            "{} {} {}",
            self.path_prefix.display(),
            ALIAS_SEPARATOR,
            self.display_name
        )
    }
}

/// Immutable, validated alias table.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
    by_path: HashMap<PathBuf, usize>,
}

impl AliasTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a raw alias list, expanding environment variables from the process environment.
    pub fn load<S: AsRef<str>>(raw: &[S]) -> Result<Self, AliasError> {
        Self::load_entries(raw, expand_env_vars)
    }

    /// Parses a raw alias list with a custom environment variable source.
    pub fn load_with_env<S, F>(raw: &[S], lookup: F) -> Result<Self, AliasError>
    where
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        Self::load_entries(raw, |value| expand_env_vars_with(value, &lookup))
    }

    fn load_entries<S, E>(raw: &[S], expand: E) -> Result<Self, AliasError>
    where
        S: AsRef<str>,
        E: Fn(&str) -> String,
    {
        let mut table = AliasTable::default();

        for (index, value) in raw.iter().enumerate() {
            let entry = parse_alias_entry(value.as_ref(), index, &expand)?;
            let key = normalize_path_for_matching(&entry.path_prefix);

            if table.by_path.contains_key(&key) {
                return Err(AliasError::new(AliasErrorKind::PathAlreadyExists, index));
            }

            table.by_path.insert(key, table.entries.len());
            table.entries.push(entry);
        }

        tracing::debug!(count = table.entries.len(), "Alias table loaded");
        Ok(table)
    }

    /// Finds the alias for an executable: exact match first, then the nearest
    /// enclosing directory that has an alias.
    pub fn resolve(&self, executable_path: &Path) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        let normalized = normalize_path_for_matching(executable_path);
        let found = normalized
            .ancestors()
            .find_map(|candidate| self.by_path.get(candidate))
            .map(|&i| self.entries[i].display_name.as_str());

        match found {
            Some(name) => {
                tracing::debug!(path = %executable_path.display(), name, "Alias matched");
            }
            None => {
                tracing::debug!(path = %executable_path.display(), "No alias for executable or its parents");
            }
        }
        found
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the table back into raw list entries, preserving order.
    pub fn to_raw_entries(&self) -> Vec<String> {
        self.entries.iter().map(AliasEntry::to_raw).collect()
    }
}

/// Parses a single raw `"path > name"` entry.
fn parse_alias_entry<E>(raw: &str, index: usize, expand: &E) -> Result<AliasEntry, AliasError>
where
    E: Fn(&str) -> String,
{
    let invalid_format = || AliasError::new(AliasErrorKind::InvalidFormat, index);

    let (path, name) = raw.split_once(ALIAS_SEPARATOR).ok_or_else(invalid_format)?;
    let (path, name) = (path.trim(), name.trim());
    if path.is_empty() || name.is_empty() {
        return Err(invalid_format());
    }

    let path = expand(path);
    if contains_any(&path, PATH_PROHIBITED_CHARS) || contains_any(name, FILENAME_PROHIBITED_CHARS) {
        return Err(AliasError::new(AliasErrorKind::InvalidCharacters, index));
    }

    Ok(AliasEntry {
        path_prefix: PathBuf::from(path),
        display_name: name.to_string(),
    })
}

/// An entry removed by [`prune_invalid_aliases`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedAlias {
    pub error: AliasError,
    pub raw: String,
}

/// Drops invalid entries one at a time until the list loads.
///
/// Each reported error index refers to the list as it was at that step, which
/// is how the settings list is edited in place.
pub fn prune_invalid_aliases(mut raw: Vec<String>) -> (AliasTable, Vec<String>, Vec<RejectedAlias>) {
    let mut rejected = Vec::new();

    loop {
        match AliasTable::load(&raw) {
            Ok(table) => return (table, raw, rejected),
            Err(error) => {
                let removed = raw.remove(error.index);
                tracing::warn!(index = error.index, kind = ?error.kind, entry = %removed, "Dropping invalid alias");
                rejected.push(RejectedAlias {
                    error,
                    raw: removed,
                });
            }
        }
    }
}
