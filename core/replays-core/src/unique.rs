//! Collision-free clip paths.
//!
//! Not atomic: another writer can take the returned path between this check
//! and the rename that follows. The host saves one replay at a time, so the
//! window only matters for foreign writers in the output folder.

use std::path::{Path, PathBuf};

/// Returns `path` if it is free, otherwise the first free `stem (n).ext`, n = 1, 2, ...
pub fn ensure_unique(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n: u64 = 1;
    loop {
        let candidate = parent.join(format!("{} ({}){}", stem, n, suffix));
        if !candidate.exists() {
            tracing::debug!(path = %candidate.display(), "Clip path taken, using numbered name");
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn free_path_is_unchanged() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("clip.mp4");
        assert_eq!(ensure_unique(&target), target);
    }

    #[test]
    fn idempotent_until_created() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("clip.mp4");
        fs::write(&target, b"").unwrap();

        let first = ensure_unique(&target);
        let second = ensure_unique(&target);
        assert_eq!(first, second);
        assert_eq!(first, temp.path().join("clip (1).mp4"));
    }

    #[test]
    fn increments_past_existing_numbers() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("clip.mp4");
        fs::write(&target, b"").unwrap();
        fs::write(temp.path().join("clip (1).mp4"), b"").unwrap();

        assert_eq!(ensure_unique(&target), temp.path().join("clip (2).mp4"));
    }

    #[test]
    fn handles_missing_extension() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("clip");
        fs::write(&target, b"").unwrap();

        assert_eq!(ensure_unique(&target), temp.path().join("clip (1)"));
    }

    #[test]
    fn keeps_inner_dots_in_stem() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("osu_05.03.2024.mkv");
        fs::write(&target, b"").unwrap();

        assert_eq!(
            ensure_unique(&target),
            temp.path().join("osu_05.03.2024 (1).mkv")
        );
    }
}
