//! Filename template expansion.
//!
//! A template mixes strftime-style directives with the `%NAME` placeholder:
//!
//! ```text
//! %NAME_%d.%m.%Y_%H-%M-%S   →   osu_05.03.2024_21-07-45
//! ```
//!
//! `%NAME` is substituted first, then time directives are expanded. The result
//! is rejected (never silently repaired) when it contains a character that is
//! not allowed in file names.

use std::fmt::{self, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};

use crate::error::TemplateError;
use crate::patterns::{contains_any, FILENAME_PROHIBITED_CHARS};

pub const NAME_PLACEHOLDER: &str = "%NAME";

pub const DEFAULT_FILENAME_TEMPLATE: &str = "%NAME_%d.%m.%Y_%H-%M-%S";

/// Expands `template` into a file name (without extension).
pub fn expand_filename<Tz>(
    base_name: &str,
    template: &str,
    timestamp: &DateTime<Tz>,
) -> Result<String, TemplateError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if template.is_empty() {
        return Err(TemplateError::EmptyTemplate);
    }

    let substituted = template.replace(NAME_PLACEHOLDER, base_name);
    let expansion_error = || TemplateError::ExpansionError {
        template: template.to_string(),
    };

    let items: Vec<Item<'_>> = StrftimeItems::new(&substituted).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(expansion_error());
    }

    let mut filename = String::with_capacity(substituted.len() + 16);
    write!(filename, "{}", timestamp.format_with_items(items.iter()))
        .map_err(|_| expansion_error())?;

    if contains_any(&filename, FILENAME_PROHIBITED_CHARS) {
        return Err(TemplateError::ProhibitedCharacters { filename });
    }

    Ok(filename)
}

/// Like [`expand_filename`], but retries with [`DEFAULT_FILENAME_TEMPLATE`] when
/// the user template is unusable. Opt-in policy for UI callers; placement
/// itself always fails fast.
pub fn expand_or_default<Tz>(
    base_name: &str,
    template: &str,
    timestamp: &DateTime<Tz>,
) -> Result<String, TemplateError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    expand_filename(base_name, template, timestamp).or_else(|err| {
        tracing::warn!(error = %err, "Invalid filename template, using default");
        expand_filename(base_name, DEFAULT_FILENAME_TEMPLATE, timestamp)
    })
}

/// Checks a template the way the settings panel does: with a sample name, now.
pub fn check_template(template: &str) -> Result<String, TemplateError> {
    expand_filename("clipname", template, &Local::now())
}
