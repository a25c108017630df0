//! Dart Sass process spawning.
//!
//! The `sass` executable compiles into a scratch directory; the CSS and map
//! it leaves there are read back into a [`CompilationResult`] so that the
//! caller decides where and how they are persisted.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::error::CompileError;
use super::output::{source_map_path, strip_source_mapping_url, CompilationResult, SourceMap};
use super::style::{CompileOptions, StyleCompiler};
use crate::config::CompilerConfig;

/// Default executable name.
pub const DEFAULT_SASS_BINARY: &str = "sass";

/// [`StyleCompiler`] backed by the Dart Sass command-line tool.
#[derive(Debug, Clone)]
pub struct SassCompiler {
    binary: String,
    options: CompileOptions,
    load_paths: Vec<PathBuf>,
    timeout: Option<Duration>,
}

impl Default for SassCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_SASS_BINARY)
    }
}

impl SassCompiler {
    /// Create a compiler running `binary` with default options.
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            options: CompileOptions::default(),
            load_paths: Vec::new(),
            timeout: None,
        }
    }

    /// Create a compiler from the `[compiler]` configuration table.
    #[must_use]
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            options: config.options(),
            load_paths: config.load_paths.clone(),
            timeout: config.timeout(),
        }
    }

    /// Set the compile options.
    #[must_use]
    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a directory searched for imports.
    #[must_use]
    pub fn load_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.load_paths.push(dir.into());
        self
    }

    /// Kill the compiler if it runs longer than `limit`.
    #[must_use]
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Get the executable name.
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Build the command-line arguments compiling `source` into `destination`.
    #[must_use]
    pub fn build_args(&self, source: &Path, destination: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            format!("--style={}", self.options.style.as_str()).into(),
            "--no-error-css".into(),
        ];

        if self.options.source_map {
            args.push("--source-map".into());
            // Sources stay resolvable once the map leaves the scratch directory.
            args.push("--source-map-urls=absolute".into());
            if self.options.source_map_include_sources {
                args.push("--embed-sources".into());
            }
        } else {
            args.push("--no-source-map".into());
        }

        for dir in &self.load_paths {
            let mut arg = OsString::from("--load-path=");
            arg.push(dir.as_os_str());
            args.push(arg);
        }

        args.push(source.as_os_str().to_owned());
        args.push(destination.as_os_str().to_owned());
        args
    }

    async fn read_outputs(&self, css_path: &Path) -> Result<CompilationResult, CompileError> {
        let css = read_output(css_path).await?;
        let css = strip_source_mapping_url(&css).to_string();

        let source_map = if self.options.source_map {
            let map = read_output(&source_map_path(css_path)).await?;
            Some(match serde_json::from_str(&map) {
                Ok(value) => SourceMap::Structured(value),
                Err(e) => {
                    tracing::warn!(error = %e, "Source map is not valid JSON, keeping it as text");
                    SourceMap::Text(map)
                }
            })
        } else {
            None
        };

        Ok(CompilationResult { css, source_map })
    }
}

async fn read_output(path: &Path) -> Result<String, CompileError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CompileError::MissingOutput {
            path: path.to_path_buf(),
            source,
        })
}

#[async_trait]
impl StyleCompiler for SassCompiler {
    async fn compile(&self, source: &Path) -> Result<CompilationResult, CompileError> {
        let scratch = tempfile::Builder::new().prefix("scss-watch").tempdir()?;
        let stem = source
            .file_stem()
            .map_or_else(|| "style".into(), |s| s.to_string_lossy());
        let css_path = scratch.path().join(format!("{stem}.css"));

        let args = self.build_args(source, &css_path);
        tracing::debug!(binary = %self.binary, ?args, "Spawning sass");

        let mut cmd = Command::new(&self.binary);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| CompileError::from_spawn(&self.binary, e))?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| CompileError::Timeout { after: limit })??,
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            return Err(CompileError::from_stderr(&output.stderr, output.status));
        }

        if !output.stderr.is_empty() {
            tracing::warn!(
                source = %source.display(),
                "{}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        self.read_outputs(&css_path).await
    }
}
