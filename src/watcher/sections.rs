//! Discovery of section files.

use std::path::{Path, PathBuf};

use super::error::WatcherError;

/// Whether `path` has the tracked `extension` (given without the dot).
#[must_use]
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

/// List the files in `dir` carrying `extension`, sorted by path.
///
/// Subdirectories are not descended into.
///
/// # Errors
///
/// Returns [`WatcherError::DirectoryMissing`] if `dir` does not exist and
/// [`WatcherError::ReadDir`] if it cannot be listed.
pub fn scan_sections(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, WatcherError> {
    if !dir.is_dir() {
        return Err(WatcherError::DirectoryMissing(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|source| WatcherError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| has_extension(path, extension) && path.is_file())
        .collect();
    files.sort();
    Ok(files)
}
