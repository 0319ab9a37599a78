use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

// Helper function to set up a test Command instance against a fresh data directory
fn set_up_command(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vigil").unwrap();
    // Set environment variables that will affect the test
    cmd.env_clear()
        .env("HOME", "/tmp")
        .env("VIGIL_DIR", data_dir.path());
    cmd
}

#[test]
#[serial]
fn test_cli_orderly_session_with_no_input() {
    let dir = TempDir::new().unwrap();
    let mut cmd = set_up_command(&dir);

    // With stdin at EOF every prompt reads as blank, so the session walks
    // straight through to the closing summary
    cmd.write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("WELCOME"))
        .stdout(predicate::str::contains("Nothing more to review."))
        .stdout(predicate::str::contains("Day streak: 1."));

    // First run seeds the data files
    for file in [
        "entries.json",
        "tags.json",
        "params.json",
        "states.json",
        "screens.json",
    ] {
        assert!(dir.path().join(file).exists(), "{} not created", file);
    }
}

#[test]
#[serial]
fn test_cli_data_dir_flag_overrides_env() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();

    let mut cmd = set_up_command(&env_dir);
    cmd.arg("--data-dir")
        .arg(flag_dir.path())
        .write_stdin("")
        .assert()
        .success();

    assert!(flag_dir.path().join("entries.json").exists());
    assert!(!env_dir.path().join("entries.json").exists());
}

#[test]
#[serial]
fn test_cli_intake_persists_entry() {
    let dir = TempDir::new().unwrap();
    let mut cmd = set_up_command(&dir);

    // Two acks, one prayer with its category, then a blank line to finish
    cmd.write_stdin("\n\nPray for family\nFamily\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 added"));

    let entries = std::fs::read_to_string(dir.path().join("entries.json")).unwrap();
    assert!(entries.contains("Pray for family"));
    assert!(entries.contains("Family"));
}

#[test]
#[serial]
fn test_cli_export_command() {
    let dir = TempDir::new().unwrap();
    let mut cmd = set_up_command(&dir);

    cmd.write_stdin("export\n").assert().success();

    assert!(dir.path().join("export.json").exists());
}

#[test]
#[serial]
fn test_cli_incomplete_state_table_fails_naming_the_kind() {
    let dir = TempDir::new().unwrap();

    // Seed the directory, then break the state table
    set_up_command(&dir).write_stdin("").assert().success();
    std::fs::write(
        dir.path().join("states.json"),
        r#"[
            {"name": "WELCOME", "action": "advance", "next": "CLOSING", "auto": false},
            {"name": "CLOSING", "action": "terminate", "next": null, "auto": false}
        ]"#,
    )
    .unwrap();

    let mut cmd = set_up_command(&dir);
    cmd.write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required action kind"))
        .stderr(predicate::str::contains("collect_new"))
        .stderr(predicate::str::contains("review_past"));
}

#[test]
#[serial]
fn test_cli_malformed_entries_file_fails() {
    let dir = TempDir::new().unwrap();

    set_up_command(&dir).write_stdin("").assert().success();
    std::fs::write(dir.path().join("entries.json"), "not json").unwrap();

    let mut cmd = set_up_command(&dir);
    cmd.write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("entries.json"));
}

#[test]
#[serial]
fn test_cli_verbose_flag() {
    let dir = TempDir::new().unwrap();
    let mut cmd = set_up_command(&dir);

    cmd.arg("--verbose").write_stdin("").assert().success();
}

#[test]
#[serial]
fn test_cli_invalid_log_format_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut cmd = set_up_command(&dir);

    cmd.arg("--log-format")
        .arg("xml")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
