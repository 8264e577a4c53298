// The working directory is process-wide, so this file holds a single test.

use sentry_release_action::cli::OutputManager;
use sentry_release_action::cli::commands::perform_release;
use sentry_release_action::error::ServiceError;
use sentry_release_action::telemetry::{Telemetry, TelemetryOptions};
use sentry_release_action::{EnvConfig, ReleaseApi, Result};
use std::path::PathBuf;
use std::sync::Mutex;

/// Fails every command and remembers where it ran
#[derive(Default)]
struct FailingClient {
    seen_dirs: Mutex<Vec<PathBuf>>,
}

impl ReleaseApi for FailingClient {
    async fn execute(&self, args: Vec<String>, _live: bool) -> Result<String> {
        self.seen_dirs
            .lock()
            .unwrap()
            .push(std::env::current_dir()?);
        Err(ServiceError::CommandFailed {
            command: args.join(" "),
            status: "exit status: 1".to_string(),
            stderr: "boom".to_string(),
        }
        .into())
    }
}

#[tokio::test]
async fn test_working_directory_restored_after_failure() {
    let workspace = tempfile::tempdir().unwrap();
    std::fs::create_dir(workspace.path().join("frontend")).unwrap();
    let before = std::env::current_dir().unwrap();

    let env = EnvConfig::from_pairs([
        ("SENTRY_ORG", "org"),
        ("SENTRY_AUTH_TOKEN", "token"),
        ("SENTRY_PROJECT", "web"),
        ("GITHUB_WORKSPACE", workspace.path().to_str().unwrap()),
    ])
    .with_input("working_directory", "frontend")
    .with_input("release", "v1");

    let client = FailingClient::default();
    let telemetry = Telemetry::new(&TelemetryOptions::default());
    let result = perform_release(&env, &client, &telemetry, &OutputManager::new(true)).await;

    assert!(result.is_err());
    assert_eq!(std::env::current_dir().unwrap(), before);

    let seen = client.seen_dirs.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].canonicalize().unwrap(),
        workspace.path().join("frontend").canonicalize().unwrap()
    );
}
