//! Path utilities for output naming

use std::path::{Path, PathBuf};

/// Derives output paths that do not collide with existing files
pub struct SafeFileNamer;

impl SafeFileNamer {
    /// Return `candidate` if unused, else the first unused `{stem}_{n}{ext}`
    ///
    /// Checks the filesystem at call time, so files written by earlier
    /// segments of the same run count as taken.
    pub fn unique_path(candidate: &Path) -> PathBuf {
        Self::unique_path_with(candidate, |path| path.exists())
    }

    /// Same as [`SafeFileNamer::unique_path`] with a caller-supplied existence check
    pub fn unique_path_with<F>(candidate: &Path, exists: F) -> PathBuf
    where
        F: Fn(&Path) -> bool,
    {
        if !exists(candidate) {
            return candidate.to_path_buf();
        }

        let stem = candidate
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = candidate
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut counter: u64 = 1;
        loop {
            let next = candidate.with_file_name(format!("{}_{}{}", stem, counter, extension));
            if !exists(&next) {
                return next;
            }
            counter += 1;
        }
    }
}

/// Last path component for display, falling back to the whole path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
