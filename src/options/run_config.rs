//! Fully resolved options for one invocation.

use super::{
    Commits, OptionResult, ReleaseRequest, boolean_option, check_environment, list_option,
    projects, release_request, string_option, timestamp_option, working_directory,
};
use crate::env::EnvConfig;
use std::path::PathBuf;

/// Every option the release sequence needs, validated up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Explicit release and prefix (resolved later against the service)
    pub release: ReleaseRequest,
    /// Target projects, never empty
    pub projects: Vec<String>,
    /// Deploy environment; no deploy is registered without it
    pub environment: Option<String>,
    /// Deploy start, seconds since the epoch
    pub started_at: Option<i64>,
    /// Sourcemap paths to inject and upload
    pub sourcemaps: Vec<String>,
    /// Distribution label for uploaded files
    pub dist: Option<String>,
    /// URL prefix for uploaded files
    pub url_prefix: Option<String>,
    /// Close the release when done
    pub finalize: bool,
    /// Inject debug ids before uploading sourcemaps
    pub inject: bool,
    /// Passed to automatic commit association
    pub ignore_missing: bool,
    /// Passed to automatic commit association
    pub ignore_empty: bool,
    /// Strip the common path prefix of uploaded files
    pub strip_common_prefix: bool,
    /// Commit association
    pub commits: Commits,
    /// Directory to run in; empty means the current directory
    pub working_directory: PathBuf,
}

impl RunConfig {
    /// Read and validate all options. Never touches the network.
    pub fn resolve(env: &EnvConfig) -> OptionResult<Self> {
        check_environment(env)?;

        Ok(Self {
            environment: string_option(env, "environment"),
            inject: boolean_option(env, "inject", true)?,
            sourcemaps: list_option(env, "sourcemaps"),
            dist: string_option(env, "dist"),
            finalize: boolean_option(env, "finalize", true)?,
            ignore_missing: boolean_option(env, "ignore_missing", false)?,
            ignore_empty: boolean_option(env, "ignore_empty", false)?,
            started_at: timestamp_option(env, "started_at")?,
            commits: Commits::resolve(env)?,
            projects: projects(env)?,
            url_prefix: string_option(env, "url_prefix"),
            strip_common_prefix: boolean_option(env, "strip_common_prefix", false)?,
            release: release_request(env),
            working_directory: working_directory(env),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn base_env() -> EnvConfig {
        EnvConfig::from_pairs([
            ("SENTRY_ORG", "org"),
            ("SENTRY_AUTH_TOKEN", "token"),
            ("SENTRY_PROJECT", "proj"),
        ])
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::resolve(&base_env()).unwrap();
        assert_eq!(config.projects, vec!["proj"]);
        assert!(config.finalize);
        assert!(config.inject);
        assert!(!config.ignore_missing);
        assert!(!config.ignore_empty);
        assert!(!config.strip_common_prefix);
        assert_eq!(config.commits, Commits::Auto);
        assert!(config.sourcemaps.is_empty());
        assert_eq!(config.environment, None);
        assert_eq!(config.started_at, None);
        assert_eq!(config.release, ReleaseRequest::default());
    }

    #[test]
    fn test_environment_checked_first() {
        let env = EnvConfig::default().with_input("finalize", "nope");
        assert!(matches!(
            RunConfig::resolve(&env),
            Err(ConfigError::MissingEnvironment { variable: "SENTRY_ORG", .. })
        ));
    }

    #[test]
    fn test_invalid_option_fails() {
        let env = base_env().with_input("ignore_empty", "maybe");
        assert_eq!(
            RunConfig::resolve(&env),
            Err(ConfigError::NotABoolean {
                name: "ignore_empty".to_string()
            })
        );
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let env = base_env()
            .with_input("release", "refs/tags/v2.0.0")
            .with_input("projects", "a b")
            .with_input("sourcemaps", "./dist")
            .with_input("started_at", "2017-07-13")
            .with_input("environment", "production");
        assert_eq!(RunConfig::resolve(&env), RunConfig::resolve(&env));
    }
}
