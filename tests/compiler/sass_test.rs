//! Tests for the Dart Sass backend.

use std::path::Path;
use std::time::Duration;

use scss_watch::compiler::{
    compile_and_write, CompileError, CompileOutcome, SassCompiler, StyleCompiler,
};
use tempfile::TempDir;

fn sass_available() -> bool {
    std::process::Command::new("sass")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

#[test]
fn builder_adds_load_paths() {
    let compiler = SassCompiler::new("sass").load_path("node_modules");
    let args = compiler.build_args(Path::new("in.scss"), Path::new("out.css"));
    assert!(args.iter().any(|a| a == "--load-path=node_modules"));
}

#[cfg(unix)]
#[tokio::test]
async fn hung_compiler_is_killed_after_timeout() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let binary = dir.path().join("slow-sass");
    std::fs::write(&binary, "#!/bin/sh\nsleep 5\n").unwrap();
    std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();
    let source = dir.path().join("style.scss");
    std::fs::write(&source, "a { b: c; }").unwrap();

    let compiler = SassCompiler::new(binary.to_string_lossy()).timeout(Duration::from_millis(200));
    let started = std::time::Instant::now();
    let err = compiler.compile(&source).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(matches!(
        err,
        CompileError::Timeout { after } if after == Duration::from_millis(200)
    ));
    assert_eq!(err.to_string(), "Compilation timed out after 200ms");
}

#[tokio::test]
async fn missing_binary_is_contained() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("style.scss");
    let output = dir.path().join("style.css");
    std::fs::write(&source, "a { b: c; }").unwrap();
    std::fs::write(&output, "untouched").unwrap();

    let compiler = SassCompiler::new("scss-watch-no-such-sass");
    let outcome = compile_and_write(&compiler, &source, &output).await;

    assert!(matches!(
        outcome,
        CompileOutcome::CompileFailed(CompileError::CompilerNotFound { .. })
    ));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "untouched");
}

#[tokio::test]
async fn real_sass_end_to_end() {
    if !sass_available() {
        eprintln!("Skipping test: sass not installed");
        return;
    }
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("sections")).unwrap();
    std::fs::write(
        dir.path().join("sections").join("_colors.scss"),
        "$brand: #336699;\n",
    )
    .unwrap();
    let source = dir.path().join("style.scss");
    std::fs::write(
        &source,
        "@use 'sections/colors';\n.btn { color: colors.$brand; }\n",
    )
    .unwrap();
    let output = dir.path().join("style.css");

    let outcome = compile_and_write(&SassCompiler::default(), &source, &output).await;
    assert!(outcome.is_success());

    let css = std::fs::read_to_string(&output).unwrap();
    assert!(css.contains(".btn {\n  color: #336699;\n}"));
    assert_eq!(
        css.lines().last().unwrap(),
        "/*# sourceMappingURL=style.css.map */"
    );
    let map = std::fs::read_to_string(dir.path().join("style.css.map")).unwrap();
    assert!(map.contains("_colors.scss"));
}

#[tokio::test]
async fn real_sass_syntax_error_writes_nothing() {
    if !sass_available() {
        eprintln!("Skipping test: sass not installed");
        return;
    }
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("style.scss");
    std::fs::write(&source, ".a { color: red\n").unwrap();

    let err = SassCompiler::default().compile(&source).await.unwrap_err();
    assert!(err.trace().is_some_and(|t| t.contains("style.scss")));
    assert!(!dir.path().join("style.css").exists());
}
