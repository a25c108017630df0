//! The style compiler seam.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::CompileError;
use super::output::CompilationResult;

/// CSS output formatting requested from the compiler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Expanded,
    Compressed,
}

impl OutputStyle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expanded => "expanded",
            Self::Compressed => "compressed",
        }
    }
}

/// Options every compilation is requested with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Produce a source map alongside the CSS.
    pub source_map: bool,
    /// Embed the original sources inside the source map.
    pub source_map_include_sources: bool,
    /// Output formatting.
    pub style: OutputStyle,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            source_map: true,
            source_map_include_sources: true,
            style: OutputStyle::Expanded,
        }
    }
}

/// Something that turns a style-source file into CSS.
///
/// The compiler is a black box: it receives the path of the primary file and
/// returns the compiled text plus an optional source map. It must not write
/// the final output itself; persisting is done by
/// [`write_outputs`](super::write_outputs).
#[async_trait]
pub trait StyleCompiler: Send + Sync {
    /// Compile the file at `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] when the source cannot be compiled or the
    /// compiler cannot be run.
    async fn compile(&self, source: &Path) -> Result<CompilationResult, CompileError>;
}
