//! Watchers for the primary style file and the sections directory.
//!
//! Polling is the primary mechanism; native directory notifications and a
//! periodic re-scan cover platforms where per-file polling misses new files.

mod directory;
mod error;
mod event;
mod poll;
mod registry;
mod sections;
mod set;

pub use directory::{DirectoryEvent, DirectoryWatcher};
pub use error::WatcherError;
pub use event::{ChangeEvent, DirectoryEventKind};
pub use poll::{spawn_poller, FileStamp};
pub use registry::{normalize_path, WatchRegistry, WatchRole, WatchTarget};
pub use sections::{has_extension, scan_sections};
pub use set::{WatchSet, WatchSetConfig};
