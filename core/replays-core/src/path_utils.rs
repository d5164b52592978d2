//! Path normalization utilities for consistent path comparison.
//!
//! Handles platform-specific quirks:
//! - Case-insensitive filesystems (Windows, macOS)
//! - Trailing separator and `.` component removal

use std::path::{Component, Path, PathBuf};

/// Normalizes a path for comparison without touching the filesystem.
///
/// Executables reported by the host may have exited by the time we compare,
/// so symlinks are deliberately not resolved here.
///
/// # Examples
///
/// ```ignore
/// normalize_path_for_matching("/games/osu/") -> "/games/osu"
/// normalize_path_for_matching("/games/./osu") -> "/games/osu"
/// normalize_path_for_matching("C:\\Games\\OSU") -> "c:\\games\\osu" // on Windows
/// ```
pub fn normalize_path_for_matching(path: &Path) -> PathBuf {
    let collected: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    apply_case_normalization(collected)
}

/// Returns true when both paths live on the same volume.
///
/// Compares the first component (drive prefix on Windows, root elsewhere).
/// An empty path is treated as "not configured yet" and always passes.
pub fn same_volume(a: &Path, b: &Path) -> bool {
    let (first_a, first_b) = match (a.components().next(), b.components().next()) {
        (Some(x), Some(y)) => (x, y),
        _ => return true,
    };

    let root_a = apply_case_normalization(PathBuf::from(first_a.as_os_str()));
    let root_b = apply_case_normalization(PathBuf::from(first_b.as_os_str()));
    root_a == root_b
}

/// File name without extension, as shown to the user.
pub fn file_stem_lossy(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension taken after the last `.` of the file name, if any.
pub fn extension_lossy(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().into_owned())
}

/// Applies case normalization based on platform.
fn apply_case_normalization(path: PathBuf) -> PathBuf {
    #[cfg(any(windows, target_os = "macos"))]
    {
        PathBuf::from(path.to_string_lossy().to_lowercase())
    }
    #[cfg(not(any(windows, target_os = "macos")))]
    {
        path
    }
}
