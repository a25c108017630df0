//! Native directory notifications for the sections directory.
//!
//! Bridges notify's callback thread into a tokio channel so the watch set
//! can select on it alongside its timers.

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::error::WatcherError;
use super::event::DirectoryEventKind;
use super::sections::has_extension;

/// Events emitted by the directory watcher.
#[derive(Debug)]
pub enum DirectoryEvent {
    /// A tracked file was created, modified or removed.
    Changed {
        kind: DirectoryEventKind,
        path: PathBuf,
    },
    /// The backend reported an error.
    Error(WatcherError),
}

/// Non-recursive native watch on one directory, filtered by extension.
pub struct DirectoryWatcher {
    dir: PathBuf,
    _watcher: RecommendedWatcher,
}

impl std::fmt::Debug for DirectoryWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryWatcher")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

impl DirectoryWatcher {
    /// Start watching `dir` for files ending in `extension`.
    ///
    /// Returns the watcher and a receiver for its events. Dropping the
    /// watcher stops the notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the native watcher cannot be created or the
    /// directory cannot be registered with it.
    pub fn new(
        dir: &Path,
        extension: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<DirectoryEvent>), WatcherError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let extension = extension.to_string();

        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
                match result {
                    Ok(event) => {
                        let Some(kind) = DirectoryEventKind::from_notify(&event.kind) else {
                            return;
                        };
                        for path in event.paths {
                            if has_extension(&path, &extension) {
                                let _ = tx.send(DirectoryEvent::Changed { kind, path });
                            }
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(DirectoryEvent::Error(WatcherError::Notify(e)));
                    }
                }
            })?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        Ok((
            Self {
                dir: dir.to_path_buf(),
                _watcher: watcher,
            },
            rx,
        ))
    }

    /// Get the directory being watched.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
