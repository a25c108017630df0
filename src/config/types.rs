//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compiler::{CompileOptions, OutputStyle};

/// Polling and re-scan intervals, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IntervalConfig {
    /// How often the primary file is stat'ed.
    pub primary_poll_ms: u64,
    /// How often each section file is stat'ed.
    pub section_poll_ms: u64,
    /// How often the sections directory is re-scanned for new files.
    pub rescan_ms: u64,
}

impl IntervalConfig {
    #[must_use]
    pub fn primary_poll(&self) -> Duration {
        Duration::from_millis(self.primary_poll_ms.max(1))
    }

    #[must_use]
    pub fn section_poll(&self) -> Duration {
        Duration::from_millis(self.section_poll_ms.max(1))
    }

    #[must_use]
    pub fn rescan(&self) -> Duration {
        Duration::from_millis(self.rescan_ms.max(1))
    }
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            primary_poll_ms: 500,
            section_poll_ms: 300,
            rescan_ms: 3000,
        }
    }
}

/// Configuration for the external sass compiler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompilerConfig {
    /// Executable to run. Resolved through `PATH` when not absolute.
    pub binary: String,
    /// Output formatting.
    pub style: OutputStyle,
    /// Emit a source map next to the CSS.
    pub source_map: bool,
    /// Embed original sources inside the source map.
    pub embed_sources: bool,
    /// Extra directories searched for `@use` and `@import`.
    pub load_paths: Vec<PathBuf>,
    /// Kill the compiler if it runs longer than this. Zero disables the limit.
    pub timeout_secs: u64,
}

impl CompilerConfig {
    /// Options passed to the compiler on every invocation.
    #[must_use]
    pub fn options(&self) -> CompileOptions {
        CompileOptions {
            source_map: self.source_map,
            source_map_include_sources: self.embed_sources,
            style: self.style,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            binary: "sass".to_string(),
            style: OutputStyle::Expanded,
            source_map: true,
            embed_sources: true,
            load_paths: Vec::new(),
            timeout_secs: 60,
        }
    }
}

/// Top-level watch configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WatchConfig {
    /// Primary style-source file that gets compiled.
    pub source: PathBuf,
    /// Destination of the compiled CSS. The map lands next to it with `.map` appended.
    pub output: PathBuf,
    /// Directory of section files included by the primary file.
    pub sections_dir: PathBuf,
    /// Extension (without the dot) identifying section files.
    pub section_extension: String,
    /// Use native directory notifications on top of polling.
    pub directory_events: bool,
    /// Fold every change already queued into a single compilation.
    pub coalesce: bool,
    pub intervals: IntervalConfig,
    pub compiler: CompilerConfig,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("css/style.scss"),
            output: PathBuf::from("css/style.css"),
            sections_dir: PathBuf::from("css/sections"),
            section_extension: "scss".to_string(),
            directory_events: true,
            coalesce: true,
            intervals: IntervalConfig::default(),
            compiler: CompilerConfig::default(),
        }
    }
}
