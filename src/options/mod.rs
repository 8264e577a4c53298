//! Option reader: turns step inputs into typed values.
//!
//! Every getter fails fast with a [`ConfigError`] naming the option, so a bad
//! configuration never reaches the release service.

mod commits;
mod release;
mod run_config;
mod timestamp;

pub use commits::{CommitRange, Commits, SetCommitsMode, commit_range, set_commits_option};
pub use release::{ReleaseRequest, release_request};
pub use run_config::RunConfig;
pub use timestamp::{parse_timestamp, timestamp_option};

use crate::env::EnvConfig;
use crate::error::ConfigError;
use std::path::PathBuf;

/// Result type for option parsing
pub type OptionResult<T> = std::result::Result<T, ConfigError>;

/// First non-empty input among `names`, in order.
///
/// Deprecated aliases are listed after the name that replaced them.
pub fn first_input<'a>(env: &'a EnvConfig, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| env.input(name))
}

/// Fetch a boolean option. Accepts `true`/`1` and `false`/`0`, case-insensitive.
pub fn boolean_option(env: &EnvConfig, name: &str, default: bool) -> OptionResult<bool> {
    let Some(value) = env.input(name) else {
        return Ok(default);
    };

    match value.to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::NotABoolean {
            name: name.to_string(),
        }),
    }
}

/// Whitespace-separated list. Absent input yields an empty list.
pub fn list_option(env: &EnvConfig, name: &str) -> Vec<String> {
    env.input(name)
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Optional free-form string
pub fn string_option(env: &EnvConfig, name: &str) -> Option<String> {
    env.input(name).map(str::to_string)
}

/// Check for required environment variables.
///
/// The project slug is not checked here; [`projects`] owns that rule.
pub fn check_environment(env: &EnvConfig) -> OptionResult<()> {
    if env.get("SENTRY_ORG").is_none() {
        return Err(ConfigError::MissingEnvironment {
            variable: "SENTRY_ORG",
            description: "an organization slug",
        });
    }
    if env.get("SENTRY_AUTH_TOKEN").is_none() {
        return Err(ConfigError::MissingEnvironment {
            variable: "SENTRY_AUTH_TOKEN",
            description: "an auth token",
        });
    }
    Ok(())
}

/// Projects from the `projects` input, falling back to `SENTRY_PROJECT`.
pub fn projects(env: &EnvConfig) -> OptionResult<Vec<String>> {
    let projects = list_option(env, "projects");
    if !projects.is_empty() {
        return Ok(projects);
    }

    env.get("SENTRY_PROJECT")
        .map(|project| vec![project])
        .ok_or(ConfigError::NoProjects)
}

/// `GITHUB_WORKSPACE` joined with the `working_directory` input.
///
/// Textual only: the path is neither checked nor canonicalized. An empty
/// result means "stay where we are".
pub fn working_directory(env: &EnvConfig) -> PathBuf {
    let workspace = env.get("GITHUB_WORKSPACE").map(PathBuf::from);

    match (workspace, env.input("working_directory")) {
        (Some(base), Some(relative)) => base.join(relative.trim_start_matches(['/', '\\'])),
        (Some(base), None) => base,
        (None, Some(relative)) => PathBuf::from(relative),
        (None, None) => PathBuf::new(),
    }
}
