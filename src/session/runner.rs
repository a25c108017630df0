//! Watch session: register watches, compile once, then drain a serial
//! compile queue fed by the watch set.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::stats::SessionStats;
use crate::compiler::{compile_and_write, StyleCompiler};
use crate::config::WatchConfig;
use crate::display;
use crate::watcher::{ChangeEvent, WatchSet, WatchSetConfig};

/// Runs one compile-on-change session until cancelled.
///
/// Compilations happen one at a time on the session task. Changes detected
/// while a compilation runs wait on the queue; with coalescing enabled every
/// queued change is folded into the next compilation.
pub struct WatchSession<C> {
    config: WatchConfig,
    compiler: C,
    cancel: CancellationToken,
}

impl<C: StyleCompiler> WatchSession<C> {
    /// Create a session compiling with `compiler`.
    #[must_use]
    pub fn new(config: WatchConfig, compiler: C) -> Self {
        Self {
            config,
            compiler,
            cancel: CancellationToken::new(),
        }
    }

    /// Set a cancellation token for graceful shutdown.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get a clone of the cancellation token.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Compile once, then watch and recompile until cancelled.
    pub async fn run(self) -> SessionStats {
        let mut stats = SessionStats::default();
        tracing::info!(
            source = %self.config.source.display(),
            output = %self.config.output.display(),
            sections = %self.config.sections_dir.display(),
            "Starting watch session"
        );

        // Watches take their baselines before the first compile, so edits
        // saved while it runs wait on the queue instead of being lost.
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watch_set = WatchSet::new(WatchSetConfig::from(&self.config), tx);
        watch_set.start();

        self.compile(&mut stats).await;

        let watch_cancel = self.cancel.child_token();
        let watch_task = tokio::spawn(watch_set.run(watch_cancel.clone()));

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                event = rx.recv() => {
                    let Some(event) = event else {
                        tracing::warn!("All watchers stopped");
                        break;
                    };
                    self.accept(event, &mut stats);
                    if self.config.coalesce {
                        while let Ok(extra) = rx.try_recv() {
                            display::print_change(&extra);
                            stats.record_coalesced();
                        }
                    }
                    self.compile(&mut stats).await;
                }
            }
        }

        watch_cancel.cancel();
        if let Err(e) = watch_task.await {
            tracing::warn!(error = %e, "Watch task ended abnormally");
        }
        tracing::info!(?stats, "Watch session stopped");
        stats
    }

    fn accept(&self, event: ChangeEvent, stats: &mut SessionStats) {
        tracing::debug!(path = %event.path().display(), "Change queued");
        display::print_change(&event);
        stats.record_change();
    }

    async fn compile(&self, stats: &mut SessionStats) {
        let outcome =
            compile_and_write(&self.compiler, &self.config.source, &self.config.output).await;
        stats.record_outcome(&outcome);
    }
}
