use assert_cmd::Command;
use predicates::prelude::*;

fn action() -> Command {
    let mut cmd = Command::cargo_bin("sentry-release-action").unwrap();
    cmd.env_clear()
        .env("MOCK", "true")
        .env("INPUT_DISABLE_TELEMETRY", "true");
    cmd
}

#[test]
fn test_mock_run_writes_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let output_file = dir.path().join("github_output");

    action()
        .env("INPUT_ENVIRONMENT", "production")
        .env("GITHUB_OUTPUT", &output_file)
        .arg("--quiet")
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_file).unwrap();
    assert!(content.contains("version<<ghadelimiter_"));
    assert!(content.contains("release<<ghadelimiter_"));
    assert_eq!(content.matches("\nreleases propose-version\n").count(), 2);
}

#[test]
fn test_set_output_command_without_output_file() {
    action()
        .args(["--release", "v1.2.3", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("::set-output name=release::v1.2.3"));
}

#[test]
fn test_invalid_boolean_fails() {
    action()
        .env("INPUT_FINALIZE", "maybe")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("::error::finalize is not a boolean"))
        .stderr(predicate::str::contains("finalize is not a boolean"));
}

#[test]
fn test_missing_working_directory_names_the_path() {
    let workspace = tempfile::tempdir().unwrap();

    action()
        .env("GITHUB_WORKSPACE", workspace.path())
        .env("INPUT_WORKING_DIRECTORY", "not-checked-out")
        .assert()
        .failure()
        .stdout(predicate::str::contains("::error::Cannot switch to working_directory"))
        .stderr(predicate::str::contains("not-checked-out"));
}

#[test]
fn test_missing_org_fails_without_mock() {
    Command::cargo_bin("sentry-release-action")
        .unwrap()
        .env_clear()
        .env("INPUT_DISABLE_TELEMETRY", "true")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "::error::Environment variable SENTRY_ORG is missing an organization slug",
        ));
}

#[test]
fn test_manual_without_range_fails() {
    action()
        .args(["--set-commits", "manual"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("::error::set_commits is \"manual\""));
}
