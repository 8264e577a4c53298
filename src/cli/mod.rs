//! Command line interface for sentry_release_action.
//!
//! Parses flags, layers them over the step inputs, runs the release and
//! reports the outcome with CI workflow commands.

mod actions;
mod args;
pub mod commands;
mod logging;
mod output;

pub use actions::{ActionOutput, escape_data, escape_property};
pub use args::Args;
pub use commands::execute_command;
pub use logging::init_logging;
pub use output::OutputManager;

use crate::env::EnvConfig;

/// Main CLI entry point. Returns the process exit code.
pub async fn run(env: EnvConfig) -> i32 {
    let args = Args::parse_args();
    let env = args.apply(env);
    execute_command(&args, env).await
}
