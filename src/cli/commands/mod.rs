//! Command execution: client selection, step outputs and failure reporting.

pub mod release;

use crate::cli::{ActionOutput, Args, OutputManager};
use crate::client::{EchoClient, ReleaseHandle, SentryCli};
use crate::env::EnvConfig;
use crate::error::{ReleaseError, Result};
use crate::telemetry::{TelemetryOptions, Transport};

pub use release::{execute_release, perform_release};

/// Run the release and report the outcome to the CI runner. Returns the exit code.
pub async fn execute_command(args: &Args, env: EnvConfig) -> i32 {
    let env = if env.is_mock() {
        env.with_mock_defaults()
    } else {
        env
    };
    let output = OutputManager::new(args.quiet);
    let actions = ActionOutput::new(&env);

    match run_release(&env, &output).await.and_then(|release| {
        for name in ["version", "release"] {
            actions.set_output(name, release.as_str())?;
        }
        Ok(release)
    }) {
        Ok(release) => {
            output.success(&format!("Release {} recorded", release));
            0
        }
        Err(e) => {
            report_failure(&actions, &output, &e);
            1
        }
    }
}

async fn run_release(env: &EnvConfig, output: &OutputManager) -> Result<ReleaseHandle> {
    let telemetry_options = TelemetryOptions::from_env(env)?;
    let transport = Transport::from_env(env);

    if env.is_mock() {
        log::debug!("MOCK is set, commands are echoed instead of executed");
        execute_release(env, &EchoClient, &telemetry_options, &transport, output).await
    } else {
        let client = SentryCli::new(env);
        execute_release(env, &client, &telemetry_options, &transport, output).await
    }
}

fn report_failure(actions: &ActionOutput, output: &OutputManager, error: &ReleaseError) {
    let message = error.to_string();
    actions.set_failed(&message);
    output.error(&message);

    let suggestions = error.recovery_suggestions();
    if !suggestions.is_empty() {
        output.info("Recovery suggestions:");
        for suggestion in suggestions {
            output.indent(&suggestion);
        }
    }
}
