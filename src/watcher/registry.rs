//! Registry of watched files.
//!
//! Every watched file maps to exactly one poll task, keyed by its normalized
//! path. The registry is owned by the watch set and aborts all of its tasks
//! when it is shut down or dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::task::JoinHandle;

/// Why a file is watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchRole {
    /// The primary style-source file.
    Primary,
    /// A section file from the sections directory.
    Section,
}

/// A watched file and the task polling it.
#[derive(Debug)]
pub struct WatchTarget {
    pub path: PathBuf,
    pub role: WatchRole,
    handle: JoinHandle<()>,
}

/// Normalize a path for registry lookups.
///
/// Existing paths are canonicalized; others are made absolute against the
/// current directory.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Lookup of watched files keyed by normalized path.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    targets: HashMap<PathBuf, WatchTarget>,
}

impl WatchRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` unless it is already watched.
    ///
    /// `start` is called with the normalized path only when the path is new
    /// and must return the handle of the task watching it. Returns the
    /// normalized path when a new watch was started.
    pub fn register<F>(&mut self, path: &Path, role: WatchRole, start: F) -> Option<PathBuf>
    where
        F: FnOnce(&Path) -> JoinHandle<()>,
    {
        let normalized = normalize_path(path);
        if self.targets.contains_key(&normalized) {
            return None;
        }

        let handle = start(&normalized);
        tracing::debug!(path = %normalized.display(), ?role, "Registered watch");
        self.targets.insert(
            normalized.clone(),
            WatchTarget {
                path: normalized.clone(),
                role,
                handle,
            },
        );
        Some(normalized)
    }

    /// Whether `path` is already watched.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.targets.contains_key(&normalize_path(path))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of watched files with the given role.
    #[must_use]
    pub fn count(&self, role: WatchRole) -> usize {
        self.targets.values().filter(|t| t.role == role).count()
    }

    /// Watched paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.targets.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Abort every poll task and forget all targets.
    pub fn shutdown(&mut self) {
        for (_, target) in self.targets.drain() {
            target.handle.abort();
        }
    }
}

impl Drop for WatchRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}
