//! Exit-status tests for the `suitesync` binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Helper to lay out a project with fixtures and a manifest
fn project(files: &[&str], manifest: &str) -> TempDir {
    let tmp = tempfile::tempdir().expect("tempdir");
    let data = tmp.path().join("testData/customScript");
    fs::create_dir_all(&data).expect("data dir");
    for file in files {
        fs::write(data.join(file), "").expect("write fixture");
    }
    fs::write(tmp.path().join("suite.json"), manifest).expect("write manifest");
    tmp
}

fn suitesync(project_root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_suitesync"))
        .arg("--project-root")
        .arg(project_root)
        .arg("--no-color")
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("run suitesync")
}

const MANIFEST: &str = r#"{
    "test_data_root": "testData/customScript",
    "cases": [
        { "name": "testA_kts", "path": "a.kts" },
        { "name": "testB_customext", "path": "b.customext" }
    ]
}"#;

#[test]
fn verify_clean_manifest_exits_zero() {
    let tmp = project(&["a.kts", "b.customext"], MANIFEST);
    let manifest = tmp.path().join("suite.json");
    let output = suitesync(tmp.path(), &["verify", manifest.to_str().expect("utf-8")]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn verify_drift_exits_one_and_lists_paths() {
    let tmp = project(&["a.kts", "b.customext", "extra.kts"], MANIFEST);
    let manifest = tmp.path().join("suite.json");
    let output = suitesync(tmp.path(), &["verify", manifest.to_str().expect("utf-8")]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("+ extra.kts"), "stderr: {stderr}");
}

#[test]
fn verify_missing_root_exits_two() {
    let tmp = project(&[], MANIFEST);
    fs::remove_dir_all(tmp.path().join("testData")).expect("remove data");
    let manifest = tmp.path().join("suite.json");
    let output = suitesync(tmp.path(), &["verify", manifest.to_str().expect("utf-8")]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn scan_lists_paths_with_names() {
    let tmp = project(&["b.customext", "a.kts"], MANIFEST);
    let root = tmp.path().join("testData/customScript");
    let output = suitesync(tmp.path(), &["scan", root.to_str().expect("utf-8"), "--names"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["testA_kts\ta.kts", "testB_customext\tb.customext"]);
}

#[cfg(unix)]
#[test]
fn run_exit_status_follows_executor() {
    let tmp = project(&["a.kts", "b.customext"], MANIFEST);
    let manifest = tmp.path().join("suite.json");
    let manifest = manifest.to_str().expect("utf-8");

    let passing = suitesync(tmp.path(), &["run", manifest, "--", "true"]);
    assert!(passing.status.success(), "stdout: {}", String::from_utf8_lossy(&passing.stdout));

    let failing = suitesync(tmp.path(), &["run", manifest, "--", "false"]);
    assert_eq!(failing.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&failing.stdout);
    assert!(stdout.contains("testA_kts"));
    assert!(stdout.contains("2 failed"));
}

#[cfg(unix)]
#[test]
fn run_json_report() {
    let tmp = project(&["a.kts", "b.customext"], MANIFEST);
    let manifest = tmp.path().join("suite.json");
    let output = suitesync(
        tmp.path(),
        &["run", manifest.to_str().expect("utf-8"), "--format", "json", "-k", "testA", "--", "true"],
    );

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["cases"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["completeness_case"], "testAllFilesPresentInCustomScript");
}
