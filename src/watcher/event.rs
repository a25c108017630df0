//! Change events carried from the watchers to the compile queue.

use std::fmt;
use std::path::{Path, PathBuf};

use super::poll::FileStamp;

/// Kind of a native directory notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryEventKind {
    Created,
    Modified,
    Removed,
}

impl DirectoryEventKind {
    /// Map a notify event kind. Access and other metadata-only kinds map to `None`.
    #[must_use]
    pub fn from_notify(kind: &notify::EventKind) -> Option<Self> {
        use notify::EventKind;

        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Modify(_) => Some(Self::Modified),
            EventKind::Remove(_) => Some(Self::Removed),
            _ => None,
        }
    }
}

impl fmt::Display for DirectoryEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        };
        f.write_str(name)
    }
}

/// A detected change that calls for recompiling the primary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The primary file's stamp changed.
    PrimaryModified { path: PathBuf },
    /// A polled section file's stamp changed.
    SectionModified {
        path: PathBuf,
        previous: FileStamp,
        current: FileStamp,
    },
    /// The sections directory reported an event for a tracked file.
    Directory {
        kind: DirectoryEventKind,
        path: PathBuf,
    },
}

impl ChangeEvent {
    /// Path the event is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PrimaryModified { path }
            | Self::SectionModified { path, .. }
            | Self::Directory { path, .. } => path,
        }
    }
}
