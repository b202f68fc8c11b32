// Integration tests for the tinydata binary

use std::process::Command;

fn tinydata() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tinydata"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_version_display() {
    let output = tinydata()
        .arg("--version")
        .output()
        .expect("Failed to run tinydata --version");

    assert!(output.status.success(), "Version command failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tinydata"), "Expected 'tinydata' in version output");
}

#[test]
fn test_help_display() {
    let output = tinydata()
        .arg("--help")
        .output()
        .expect("Failed to run tinydata --help");

    assert!(output.status.success(), "Help command failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("filter"), "Expected filter in help output");
}

#[test]
fn test_filter_help_lists_options() {
    let output = tinydata()
        .args(["filter", "--help"])
        .output()
        .expect("Failed to run tinydata filter --help");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--threshold", "--topics", "--delete", "--fail-fast", "--export"] {
        assert!(stdout.contains(flag), "Expected {} in filter help", flag);
    }
}

#[test]
fn test_invalid_threshold_rejected() {
    let output = tinydata()
        .args(["filter", "--threshold", "2.0"])
        .output()
        .expect("Failed to run tinydata filter");

    assert!(!output.status.success(), "Threshold above 1.0 should be rejected");
}

#[test]
fn test_missing_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-images");

    let output = tinydata()
        .args(["filter", "-d"])
        .arg(&missing)
        .output()
        .expect("Failed to run tinydata filter");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is not a directory"), "stderr was: {}", stderr);
}

#[test]
fn test_missing_models_fails_without_deleting() {
    let root = tempfile::tempdir().unwrap();
    let topic = root.path().join("dogs");
    std::fs::create_dir(&topic).unwrap();
    std::fs::write(topic.join("a.jpg"), b"not really an image").unwrap();
    let empty_models = tempfile::tempdir().unwrap();

    let output = tinydata()
        .args(["filter", "--delete", "--yes", "-d"])
        .arg(root.path())
        .arg("--models")
        .arg(empty_models.path())
        .output()
        .expect("Failed to run tinydata filter");

    assert!(!output.status.success());
    assert!(topic.join("a.jpg").exists());
}
