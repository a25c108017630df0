//! One compile-and-write pass.

use std::path::Path;
use std::time::{Duration, Instant};

use super::error::{CompileError, WriteError};
use super::output::{write_outputs, WrittenOutputs};
use super::style::StyleCompiler;
use crate::display;

/// How a compile-and-write pass ended.
#[derive(Debug)]
pub enum CompileOutcome {
    /// Both files were written.
    Compiled {
        outputs: WrittenOutputs,
        duration: Duration,
    },
    /// The compiler failed; nothing was written.
    CompileFailed(CompileError),
    /// Compilation succeeded but the output could not be persisted.
    WriteFailed(WriteError),
}

impl CompileOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Compiled { .. })
    }
}

/// Compile `source` and write the stylesheet to `output` plus its map.
///
/// Never fails: errors are reported on the diagnostic stream and returned as
/// an outcome so the caller keeps watching. When compilation fails neither
/// file is touched.
pub async fn compile_and_write<C>(compiler: &C, source: &Path, output: &Path) -> CompileOutcome
where
    C: StyleCompiler + ?Sized,
{
    let started = Instant::now();
    display::print_compile_start();
    tracing::debug!(
        source = %source.display(),
        output = %output.display(),
        "Invoking style compiler"
    );

    let result = match compiler.compile(source).await {
        Ok(result) => result,
        Err(e) => {
            display::print_compile_error(&e.to_string(), e.trace());
            tracing::debug!(
                elapsed_ms = started.elapsed().as_millis(),
                "Compilation failed"
            );
            return CompileOutcome::CompileFailed(e);
        }
    };

    match write_outputs(&result, output) {
        Ok(outputs) => {
            let duration = started.elapsed();
            display::print_compile_success(duration, source, output);
            CompileOutcome::Compiled { outputs, duration }
        }
        Err(e) => {
            display::print_write_error(&e);
            CompileOutcome::WriteFailed(e)
        }
    }
}
