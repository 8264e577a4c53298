//! sentry-release-action - records a release in Sentry from a CI pipeline.

use sentry_release_action::EnvConfig;
use sentry_release_action::cli;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let env = EnvConfig::from_env();
    cli::init_logging(&env);

    let exit_code = cli::run(env).await;
    process::exit(exit_code);
}
