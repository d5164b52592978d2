//! Compiled regex patterns and character sets used while validating user input.
//!
//! Patterns are compiled once on first use.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::env;

// ═══════════════════════════════════════════════════════════════════════════════
// Prohibited Characters
// ═══════════════════════════════════════════════════════════════════════════════

/// Characters that may not appear in a generated file name or an alias name.
pub const FILENAME_PROHIBITED_CHARS: &[char] = &['/', '\\', ':', '"', '<', '>', '*', '?', '|', '%'];

/// Characters that may not appear in an alias path.
pub const PATH_PROHIBITED_CHARS: &[char] = &['"', '<', '>', '*', '?', '|', '%'];

pub fn contains_any(value: &str, chars: &[char]) -> bool {
    value.contains(chars)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Environment Variable References
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches `${VAR}`, `$VAR` and `%VAR%`.
pub static RE_ENV_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{(?P<braced>[^}]+)\}|\$(?P<bare>[A-Za-z_][A-Za-z0-9_]*)|%(?P<percent>[^%]+)%")
        .unwrap()
});

/// Expands environment variable references, leaving unknown ones untouched.
pub fn expand_env_vars(value: &str) -> String {
    expand_env_vars_with(value, |name| env::var(name).ok())
}

/// Same as [`expand_env_vars`] with a custom variable source.
pub fn expand_env_vars_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    RE_ENV_VAR
        .replace_all(value, |caps: &Captures| {
            let name = caps
                .name("braced")
                .or_else(|| caps.name("bare"))
                .or_else(|| caps.name("percent"))
                .map(|m| m.as_str())
                .unwrap_or_default();
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(name: &str) -> Option<String> {
        match name {
            "GAMES" => Some("D:\\Games".to_string()),
            "HOME" => Some("/home/user".to_string()),
            _ => None,
        }
    }

    #[test]
    fn expands_all_reference_styles() {
        assert_eq!(expand_env_vars_with("%GAMES%\\osu", vars), "D:\\Games\\osu");
        assert_eq!(expand_env_vars_with("$HOME/bin", vars), "/home/user/bin");
        assert_eq!(expand_env_vars_with("${HOME}/bin", vars), "/home/user/bin");
    }

    #[test]
    fn leaves_unknown_variables_untouched() {
        assert_eq!(expand_env_vars_with("%NOPE%\\x", vars), "%NOPE%\\x");
        assert_eq!(expand_env_vars_with("$NOPE/x", vars), "$NOPE/x");
    }

    #[test]
    fn prohibited_sets_cover_separator() {
        assert!(contains_any("a>b", FILENAME_PROHIBITED_CHARS));
        assert!(contains_any("a>b", PATH_PROHIBITED_CHARS));
        assert!(!contains_any("C:\\Games\\osu", PATH_PROHIBITED_CHARS));
    }
}
