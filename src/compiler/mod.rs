//! Style compilation: the external compiler seam, the Dart Sass backend and
//! persisting results to disk.

mod error;
mod invoke;
mod output;
mod sass;
mod style;

pub use error::{CompileError, WriteError};
pub use invoke::{compile_and_write, CompileOutcome};
pub use output::{
    render_stylesheet, source_map_path, strip_source_mapping_url, write_outputs,
    CompilationResult, SourceMap, WrittenOutputs, MAP_SUFFIX,
};
pub use sass::{SassCompiler, DEFAULT_SASS_BINARY};
pub use style::{CompileOptions, OutputStyle, StyleCompiler};
