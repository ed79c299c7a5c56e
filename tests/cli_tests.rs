#![cfg(feature = "cli")]

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_config(dir: &Path, readings: &str) -> std::path::PathBuf {
    let base = dir.to_str().unwrap().replace('\\', "/");
    std::fs::write(dir.join("readings.csv"), readings).unwrap();
    let config = dir.join("rmsp.toml");
    std::fs::write(
        &config,
        format!(
            r#"
[report]
title = "CLI field"

[source]
input = "{base}/readings.csv"

[load]
output_path = "{base}/out"
output_formats = ["csv", "txt"]
"#
        ),
    )
    .unwrap();
    config
}

fn toml_rmsp(config: &Path, dry_run: bool) -> std::process::Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_toml_rmsp"));
    command.arg("--config").arg(config);
    if dry_run {
        command.arg("--dry-run");
    }
    command.env("RUST_LOG", "off").output().unwrap()
}

#[test]
fn test_dry_run_invalid_impact_reports_friendly_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        temp_dir.path(),
        "point,layer,impacts\nP1,0-5,3\nP1,5-10,three\n",
    );

    let output = toml_rmsp(&config, true);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("❌ Invalid input data"), "stderr: {stderr}");
    assert!(stderr.contains("5-10"));
    assert!(stderr.contains("💡 Suggestion"));
    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn test_dry_run_and_full_run_share_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "point,layer,impacts\nP1,0-5,-1\n");

    let dry = toml_rmsp(&config, true);
    let full = toml_rmsp(&config, false);

    assert_eq!(dry.status.code(), Some(2));
    assert_eq!(dry.status.code(), full.status.code());
}

#[test]
fn test_dry_run_prints_report_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        temp_dir.path(),
        "point,layer,impacts\nP1,0-5,3\nP1,5-10,9\n",
    );

    let output = toml_rmsp(&config, true);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Mean RP (MPa):"));
    assert!(!temp_dir.path().join("out").exists());
}
