//! Tests for rendering and persisting compiled output.

use scss_watch::compiler::{
    render_stylesheet, source_map_path, write_outputs, CompilationResult, SourceMap, MAP_SUFFIX,
};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn reference_uses_base_name_only() {
    let dir = TempDir::new().unwrap();
    let css_path = dir.path().join("deep").join("style.css");
    let result = CompilationResult::new(".a{}", Some(SourceMap::Text("{}".to_string())));

    write_outputs(&result, &css_path).unwrap();

    let css = std::fs::read_to_string(&css_path).unwrap();
    let last = css.lines().last().unwrap();
    assert_eq!(last, "/*# sourceMappingURL=style.css.map */");
    assert!(!last.contains("deep"));
}

#[test]
fn map_suffix_is_appended_not_replaced() {
    assert_eq!(MAP_SUFFIX, ".map");
    assert!(source_map_path(Path::new("out/site.min.css")).ends_with("site.min.css.map"));
}

#[test]
fn exactly_one_reference_line() {
    let rendered = render_stylesheet("a {}\n", Some("style.css.map"));
    assert_eq!(rendered.matches("sourceMappingURL").count(), 1);
    assert!(rendered.ends_with(" */\n"));
}

#[test]
fn rewriting_replaces_both_files() {
    let dir = TempDir::new().unwrap();
    let css_path = dir.path().join("style.css");

    let first = CompilationResult::new(".first {}", Some(SourceMap::Text("one".to_string())));
    let second = CompilationResult::new(".second {}", Some(SourceMap::Text("two".to_string())));
    write_outputs(&first, &css_path).unwrap();
    write_outputs(&second, &css_path).unwrap();

    assert!(std::fs::read_to_string(&css_path).unwrap().starts_with(".second {}"));
    assert_eq!(
        std::fs::read_to_string(source_map_path(&css_path)).unwrap(),
        "two"
    );
}

#[test]
fn map_file_field_names_the_written_stylesheet() {
    let dir = TempDir::new().unwrap();
    let css_path = dir.path().join("site.css");
    let map = SourceMap::Structured(serde_json::json!({
        "version": 3,
        "file": "style.css",
        "sources": ["style.scss"],
        "mappings": "",
    }));

    write_outputs(&CompilationResult::new("a {}", Some(map)), &css_path).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(source_map_path(&css_path)).unwrap())
            .unwrap();
    assert_eq!(written["file"], "site.css");
    assert_eq!(written["sources"][0], "style.scss");
}
