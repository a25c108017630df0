//! Colored CLI display utilities for watch output.
//!
//! Status lines go to stdout, failures to stderr. Everything is plain
//! human-readable text; structured diagnostics go through `tracing`.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use owo_colors::OwoColorize;

use crate::compiler::WriteError;
use crate::session::SessionStats;
use crate::watcher::{ChangeEvent, FileStamp};

/// Get current timestamp in the same format as tracing.
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Print that the primary file is being watched.
pub fn print_watching_primary(path: &Path) {
    println!(
        "{} {} Watching {} for changes...",
        timestamp().dimmed(),
        "[WATCH]".blue().bold(),
        path.display()
    );
    let _ = io::stdout().flush();
}

/// Print that the sections directory is being monitored.
pub fn print_watching_directory(dir: &Path) {
    println!(
        "{} {} Watching directory: {}",
        timestamp().dimmed(),
        "✓".green().bold(),
        dir.display()
    );
    let _ = io::stdout().flush();
}

/// Print that a section file has been registered.
pub fn print_watching_section(name: &str, normalized: &Path) {
    println!(
        "{} {} Watching section file: {} {}",
        timestamp().dimmed(),
        "✓".green().bold(),
        name,
        format!("({})", normalized.display()).dimmed()
    );
    let _ = io::stdout().flush();
}

/// Print that section watching was skipped.
pub fn print_sections_missing(dir: &Path) {
    println!(
        "{} {} Sections directory not found: {}",
        timestamp().dimmed(),
        "[SKIP]".yellow().bold(),
        dir.display()
    );
    let _ = io::stdout().flush();
}

/// Print a non-fatal setup or watch error.
pub fn print_watch_error(context: &str, message: &str) {
    eprintln!(
        "{} {} {context}: {}",
        timestamp().dimmed(),
        "[ERROR]".red().bold(),
        message.red()
    );
}

/// Print a detected change.
pub fn print_change(event: &ChangeEvent) {
    let ts = timestamp();
    match event {
        ChangeEvent::PrimaryModified { path } => {
            println!(
                "{} {} Main file changed: {}",
                ts.dimmed(),
                "[CHANGE DETECTED]".yellow().bold(),
                path.display()
            );
        }
        ChangeEvent::SectionModified {
            path,
            previous,
            current,
        } => {
            println!(
                "{} {} Section file changed: {}",
                ts.dimmed(),
                "[CHANGE DETECTED]".yellow().bold(),
                display_name(path)
            );
            println!("  Previous: {}", format_stamp(previous).dimmed());
            println!("  Current:  {}", format_stamp(current).dimmed());
        }
        ChangeEvent::Directory { kind, path } => {
            println!(
                "{} {} {kind}: {}",
                ts.dimmed(),
                "[DIRECTORY EVENT]".magenta().bold(),
                display_name(path)
            );
        }
    }
    let _ = io::stdout().flush();
}

/// Print the start of a compilation.
pub fn print_compile_start() {
    println!(
        "{} {} Starting compilation...",
        timestamp().dimmed(),
        "[COMPILING]".cyan().bold()
    );
    let _ = io::stdout().flush();
}

/// Print a successful compilation with its duration.
pub fn print_compile_success(duration: Duration, source: &Path, output: &Path) {
    println!(
        "{} {} SCSS compiled successfully in {}ms: {} -> {}",
        timestamp().dimmed(),
        "✓".green().bold(),
        duration.as_millis(),
        source.display(),
        output.display()
    );
    let _ = io::stdout().flush();
}

/// Print a compilation error and its trace.
pub fn print_compile_error(message: &str, trace: Option<&str>) {
    eprintln!(
        "{} {} SCSS compilation error: {}",
        timestamp().dimmed(),
        "✗".red().bold(),
        message.red()
    );
    if let Some(trace) = trace {
        if trace != message {
            eprintln!("{trace}");
        }
    }
}

/// Print a failure to persist compiled output.
pub fn print_write_error(err: &WriteError) {
    eprintln!(
        "{} {} Failed to write output: {}",
        timestamp().dimmed(),
        "✗".red().bold(),
        err.to_string().red()
    );
}

/// Print the summary shown on shutdown.
pub fn print_session_summary(stats: &SessionStats) {
    println!(
        "{} {} Stopped after {} compilation(s): {} succeeded, {} failed",
        timestamp().dimmed(),
        "[SHUTDOWN]".blue().bold(),
        stats.compilations,
        stats.succeeded,
        stats.failed()
    );
    let _ = io::stdout().flush();
}

/// File name of `path`, or the whole path when it has none.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Human-readable form of a file stamp.
#[must_use]
pub fn format_stamp(stamp: &FileStamp) -> String {
    match stamp.modified {
        Some(modified) => {
            let local: chrono::DateTime<chrono::Local> = modified.into();
            format!(
                "{} ({} bytes)",
                local.format("%Y-%m-%d %H:%M:%S%.3f"),
                stamp.len.unwrap_or(0)
            )
        }
        None => "missing".to_string(),
    }
}
