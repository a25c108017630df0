//! Compilation results and how they are persisted.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::WriteError;

/// Suffix appended to the CSS path to name its source map.
pub const MAP_SUFFIX: &str = ".map";

/// Source map as handed back by a compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceMap {
    /// Already serialized JSON.
    Text(String),
    /// Parsed JSON that still needs serializing.
    Structured(serde_json::Value),
}

impl SourceMap {
    /// Serialized form written to disk. Text is used verbatim.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => value.to_string(),
        }
    }

    /// Point a structured map's `file` field at `css_file_name`.
    /// Text maps are returned unchanged.
    #[must_use]
    pub fn retarget(&self, css_file_name: &str) -> Self {
        match self {
            Self::Structured(serde_json::Value::Object(fields)) => {
                let mut fields = fields.clone();
                fields.insert("file".to_string(), css_file_name.into());
                Self::Structured(serde_json::Value::Object(fields))
            }
            other => other.clone(),
        }
    }
}

/// Output of one successful compilation. Lives only until it is written.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationResult {
    pub css: String,
    pub source_map: Option<SourceMap>,
}

impl CompilationResult {
    #[must_use]
    pub fn new(css: impl Into<String>, source_map: Option<SourceMap>) -> Self {
        Self {
            css: css.into(),
            source_map,
        }
    }
}

/// Paths written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    pub css: PathBuf,
    pub map: Option<PathBuf>,
}

/// Path of the source map belonging to `css_path`: the same path with
/// [`MAP_SUFFIX`] appended.
#[must_use]
pub fn source_map_path(css_path: &Path) -> PathBuf {
    let mut raw: OsString = css_path.as_os_str().to_owned();
    raw.push(MAP_SUFFIX);
    PathBuf::from(raw)
}

/// Final stylesheet text: compiled CSS with trailing whitespace trimmed and,
/// when a map file name is given, a `sourceMappingURL` comment on the last line.
#[must_use]
pub fn render_stylesheet(css: &str, map_file_name: Option<&str>) -> String {
    let body = css.trim_end();
    match map_file_name {
        Some(name) => format!("{body}\n/*# sourceMappingURL={name} */\n"),
        None => format!("{body}\n"),
    }
}

/// Remove a trailing `sourceMappingURL` comment added by the compiler itself.
#[must_use]
pub fn strip_source_mapping_url(css: &str) -> &str {
    let trimmed = css.trim_end();
    match trimmed.rsplit_once('\n') {
        Some((head, last)) if is_mapping_comment(last) => head,
        None if is_mapping_comment(trimmed) => "",
        _ => trimmed,
    }
}

fn is_mapping_comment(line: &str) -> bool {
    let line = line.trim();
    line.starts_with("/*# sourceMappingURL=") && line.ends_with("*/")
}

/// Write the stylesheet to `css_path` and its map next to it.
///
/// Each file is written to a temporary sibling and renamed into place, so
/// readers never observe a half-written file.
///
/// # Errors
///
/// Returns a [`WriteError`] naming the first file that could not be written.
pub fn write_outputs(
    result: &CompilationResult,
    css_path: &Path,
) -> Result<WrittenOutputs, WriteError> {
    let map_path = result.source_map.as_ref().map(|_| source_map_path(css_path));
    let map_name = map_path
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned());

    let stylesheet = render_stylesheet(&result.css, map_name.as_deref());
    write_atomic(css_path, stylesheet.as_bytes())?;

    if let (Some(map), Some(path)) = (&result.source_map, &map_path) {
        let map = match css_path.file_name() {
            Some(name) => map.retarget(&name.to_string_lossy()),
            None => map.clone(),
        };
        write_atomic(path, map.to_text().as_bytes())?;
    }

    Ok(WrittenOutputs {
        css: css_path.to_path_buf(),
        map: map_path,
    })
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
    let wrap = |source| WriteError {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(wrap)?;

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(wrap)?;
    file.write_all(contents).map_err(wrap)?;
    file.flush().map_err(wrap)?;
    file.persist(path).map_err(|e| wrap(e.error))?;
    Ok(())
}
