//! Integration tests for scss-watch.

mod compiler;

#[test]
fn test_help_lists_path_flags() {
    use std::process::Command;

    let output = Command::new(env!("CARGO_BIN_EXE_scss-watch"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{stdout}{stderr}");

    assert!(output.status.success());
    for flag in ["--source", "--output", "--sections", "--sass", "--config"] {
        assert!(combined.contains(flag), "Help should mention {flag}");
    }
}

#[test]
fn test_invalid_config_exits_with_failure() {
    use std::process::Command;

    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[intervals\nrescan_ms = ").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_scss-watch"))
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.toml"));
}
