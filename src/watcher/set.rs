//! The watch set: every watch the session needs, driven from one task.
//!
//! The primary file and each section file get a stat poller. The sections
//! directory additionally gets a native notification watch and a periodic
//! re-scan that registers files created after startup. All detections are
//! sent as [`ChangeEvent`]s on a single channel.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::directory::{DirectoryEvent, DirectoryWatcher};
use super::event::ChangeEvent;
use super::poll::spawn_poller;
use super::registry::{WatchRegistry, WatchRole};
use super::sections::scan_sections;
use crate::config::WatchConfig;
use crate::display;

/// What the watch set watches and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSetConfig {
    pub primary: PathBuf,
    pub sections_dir: PathBuf,
    pub extension: String,
    pub primary_poll: Duration,
    pub section_poll: Duration,
    pub rescan: Duration,
    pub directory_events: bool,
}

impl From<&WatchConfig> for WatchSetConfig {
    fn from(config: &WatchConfig) -> Self {
        Self {
            primary: config.source.clone(),
            sections_dir: config.sections_dir.clone(),
            extension: config.section_extension.clone(),
            primary_poll: config.intervals.primary_poll(),
            section_poll: config.intervals.section_poll(),
            rescan: config.intervals.rescan(),
            directory_events: config.directory_events,
        }
    }
}

/// Owner of the watch registry and producer of change events.
#[derive(Debug)]
pub struct WatchSet {
    config: WatchSetConfig,
    events: mpsc::UnboundedSender<ChangeEvent>,
    registry: WatchRegistry,
    directory: Option<(DirectoryWatcher, mpsc::UnboundedReceiver<DirectoryEvent>)>,
    started: bool,
    sections_watched: bool,
}

impl WatchSet {
    #[must_use]
    pub fn new(config: WatchSetConfig, events: mpsc::UnboundedSender<ChangeEvent>) -> Self {
        Self {
            config,
            events,
            registry: WatchRegistry::new(),
            directory: None,
            started: false,
            sections_watched: false,
        }
    }

    /// Register every watch: the primary poller, the directory watcher and a
    /// poller per existing section file.
    ///
    /// Baselines are taken here, so changes made after this call are queued
    /// even before [`WatchSet::run`] starts. Calling it again does nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.watch_primary();

        let sections_dir = self.config.sections_dir.clone();
        if !sections_dir.is_dir() {
            display::print_sections_missing(&sections_dir);
            tracing::warn!(dir = %sections_dir.display(), "Section watching skipped");
            return;
        }
        self.sections_watched = true;

        if self.config.directory_events {
            match DirectoryWatcher::new(&sections_dir, &self.config.extension) {
                Ok((watcher, rx)) => {
                    display::print_watching_directory(watcher.dir());
                    self.directory = Some((watcher, rx));
                }
                Err(e) => {
                    display::print_watch_error(
                        "Error setting up directory watcher",
                        &e.to_string(),
                    );
                }
            }
        }

        self.rescan();
    }

    /// Get the registry of watched files.
    #[must_use]
    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    /// Start polling the primary file.
    pub fn watch_primary(&mut self) {
        let display_path = self.config.primary.clone();
        let interval = self.config.primary_poll;
        let tx = self.events.clone();

        display::print_watching_primary(&display_path);
        self.registry
            .register(&self.config.primary, WatchRole::Primary, move |normalized| {
                spawn_poller(normalized.to_path_buf(), interval, move |_, _| {
                    tx.send(ChangeEvent::PrimaryModified {
                        path: display_path.clone(),
                    })
                    .is_ok()
                })
            });
    }

    /// Register every section file not yet watched.
    ///
    /// Returns the number of newly registered files. Read errors are logged
    /// and count as zero.
    pub fn rescan(&mut self) -> usize {
        let files = match scan_sections(&self.config.sections_dir, &self.config.extension) {
            Ok(files) => files,
            Err(e) => {
                display::print_watch_error("Error reading sections directory", &e.to_string());
                return 0;
            }
        };

        let mut added = 0;
        for file in files {
            if self.watch_section(&file) {
                added += 1;
            }
        }
        if added > 0 {
            tracing::debug!(added, total = self.registry.len(), "Section re-scan");
        }
        added
    }

    fn watch_section(&mut self, file: &Path) -> bool {
        let interval = self.config.section_poll;
        let tx = self.events.clone();

        let registered = self
            .registry
            .register(file, WatchRole::Section, move |normalized| {
                let path = normalized.to_path_buf();
                spawn_poller(path.clone(), interval, move |previous, current| {
                    tx.send(ChangeEvent::SectionModified {
                        path: path.clone(),
                        previous,
                        current,
                    })
                    .is_ok()
                })
            });

        match registered {
            Some(normalized) => {
                display::print_watching_section(&display::display_name(file), &normalized);
                true
            }
            None => false,
        }
    }

    fn handle_directory_event(&mut self, event: DirectoryEvent) {
        match event {
            DirectoryEvent::Changed { kind, path } => {
                self.rescan();
                let _ = self.events.send(ChangeEvent::Directory { kind, path });
            }
            DirectoryEvent::Error(e) => {
                display::print_watch_error("Directory watcher error", &e.to_string());
            }
        }
    }

    /// Run until `cancel` fires, then tear down every watch.
    ///
    /// Starts the watches first if [`WatchSet::start`] was not called.
    pub async fn run(mut self, cancel: CancellationToken) {
        self.start();

        if !self.sections_watched {
            cancel.cancelled().await;
            self.registry.shutdown();
            return;
        }

        let (_dir_watcher, mut dir_events) = match self.directory.take() {
            Some((watcher, rx)) => (Some(watcher), Some(rx)),
            None => (None, None),
        };

        // Pick up files created between start and now.
        self.rescan();

        let period = self.config.rescan;
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.rescan();
                }
                event = next_directory_event(&mut dir_events), if dir_events.is_some() => {
                    match event {
                        Some(event) => self.handle_directory_event(event),
                        None => {
                            tracing::warn!("Directory watcher stopped; relying on polling");
                            dir_events = None;
                        }
                    }
                }
            }
        }

        tracing::debug!(watched = self.registry.len(), "Tearing down watches");
        self.registry.shutdown();
    }
}

async fn next_directory_event(
    rx: &mut Option<mpsc::UnboundedReceiver<DirectoryEvent>>,
) -> Option<DirectoryEvent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(dir: &Path) -> WatchSetConfig {
        WatchSetConfig {
            primary: dir.join("style.scss"),
            sections_dir: dir.join("sections"),
            extension: "scss".to_string(),
            primary_poll: Duration::from_millis(20),
            section_poll: Duration::from_millis(20),
            rescan: Duration::from_millis(100),
            directory_events: false,
        }
    }

    #[test]
    fn test_config_from_watch_config() {
        let config = WatchSetConfig::from(&WatchConfig::default());
        assert_eq!(config.primary, PathBuf::from("css/style.scss"));
        assert_eq!(config.sections_dir, PathBuf::from("css/sections"));
        assert_eq!(config.primary_poll, Duration::from_millis(500));
        assert_eq!(config.section_poll, Duration::from_millis(300));
        assert_eq!(config.rescan, Duration::from_secs(3));
        assert!(config.directory_events);
    }

    #[tokio::test]
    async fn test_rescan_registers_each_file_once() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sections")).unwrap();
        std::fs::write(dir.path().join("sections/_a.scss"), "").unwrap();
        std::fs::write(dir.path().join("sections/_b.scss"), "").unwrap();

        let (tx, _rx) = mpsc::unbounded_channel();
        let mut set = WatchSet::new(config_for(dir.path()), tx);

        assert_eq!(set.rescan(), 2);
        assert_eq!(set.rescan(), 0);

        std::fs::write(dir.path().join("sections/_c.scss"), "").unwrap();
        assert_eq!(set.rescan(), 1);
        assert_eq!(set.registry().count(WatchRole::Section), 3);
    }

    #[tokio::test]
    async fn test_rescan_of_missing_directory_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut set = WatchSet::new(config_for(dir.path()), tx);
        assert_eq!(set.rescan(), 0);
        assert!(set.registry().is_empty());
    }

    #[tokio::test]
    async fn test_section_change_is_sent() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sections")).unwrap();
        let section = dir.path().join("sections/_a.scss");
        std::fs::write(&section, "a").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut set = WatchSet::new(config_for(dir.path()), tx);
        set.rescan();

        std::fs::write(dir.path().join("sections/_a.tmp"), "a { b: c; }").unwrap();
        std::fs::rename(dir.path().join("sections/_a.tmp"), &section).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, ChangeEvent::SectionModified { .. }));
        assert!(event.path().ends_with("_a.scss"));
    }

    #[tokio::test]
    async fn test_start_queues_changes_before_run() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sections")).unwrap();
        std::fs::write(dir.path().join("style.scss"), "a {}").unwrap();
        std::fs::write(dir.path().join("sections/_a.scss"), "").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut set = WatchSet::new(config_for(dir.path()), tx);
        set.start();
        set.start();
        assert_eq!(set.registry().count(WatchRole::Primary), 1);
        assert_eq!(set.registry().count(WatchRole::Section), 1);

        std::fs::write(dir.path().join("style.tmp"), "a { b: c; }").unwrap();
        std::fs::rename(dir.path().join("style.tmp"), dir.path().join("style.scss")).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, ChangeEvent::PrimaryModified { .. }));
    }

    #[tokio::test]
    async fn test_run_tears_down_on_cancel() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("style.scss"), "").unwrap();

        let (tx, _rx) = mpsc::unbounded_channel();
        let set = WatchSet::new(config_for(dir.path()), tx);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(set.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap();
    }
}
