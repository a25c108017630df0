//! Stat-based polling of single files.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// What polling compares between two ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStamp {
    /// Last modification time, when the file exists and the platform reports it.
    pub modified: Option<SystemTime>,
    /// Length in bytes, `None` when the file does not exist.
    pub len: Option<u64>,
}

impl FileStamp {
    /// Stamp of a file that does not exist.
    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }

    /// Stat `path` synchronously. Any error reads as a missing file.
    #[must_use]
    pub fn read(path: &Path) -> Self {
        std::fs::metadata(path).map_or_else(|_| Self::missing(), |m| Self::from_metadata(&m))
    }

    /// Stat `path` without blocking the runtime.
    pub async fn read_async(path: &Path) -> Self {
        tokio::fs::metadata(path)
            .await
            .map_or_else(|_| Self::missing(), |m| Self::from_metadata(&m))
    }

    fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        Self {
            modified: metadata.modified().ok(),
            len: Some(metadata.len()),
        }
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.len.is_some()
    }
}

/// Spawn a task that stats `path` every `interval` and calls `on_change`
/// with the previous and current stamp whenever they differ.
///
/// The baseline stamp is taken before this returns, so a change made right
/// after registration is still seen. The task ends when `on_change` returns
/// `false` or the handle is aborted.
pub fn spawn_poller<F>(path: PathBuf, interval: Duration, mut on_change: F) -> JoinHandle<()>
where
    F: FnMut(FileStamp, FileStamp) -> bool + Send + 'static,
{
    let mut previous = FileStamp::read(&path);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let current = FileStamp::read_async(&path).await;
            if current == previous {
                continue;
            }

            tracing::trace!(path = %path.display(), ?previous, ?current, "Stamp changed");
            if !on_change(previous, current) {
                tracing::debug!(path = %path.display(), "Poller receiver gone, stopping");
                break;
            }
            previous = current;
        }
    })
}
