//! Command line argument parsing.
//!
//! In CI every option arrives as an `INPUT_*` variable. The flags below exist
//! for local runs and override those variables; their values are validated by
//! the option reader, not by clap, so both surfaces report the same errors.

use crate::env::EnvConfig;
use clap::Parser;

/// Record a release in Sentry from a CI pipeline
#[derive(Parser, Debug, Default)]
#[command(
    name = "sentry-release-action",
    version,
    about = "Create a Sentry release, associate commits, upload sourcemaps, register a deploy and finalize",
    long_about = "Create a Sentry release, associate commits, upload sourcemaps, register a deploy and finalize.

Options are read from INPUT_* environment variables (the CI input convention)
and may be overridden on the command line:
  sentry-release-action --environment production --sourcemaps ./dist
  sentry-release-action --set-commits manual --commit-range my-org/app,abc123,def456

Requires SENTRY_ORG and SENTRY_AUTH_TOKEN; projects come from --projects or SENTRY_PROJECT."
)]
pub struct Args {
    /// Release identifier (a refs/tags/ prefix is stripped)
    #[arg(long)]
    pub release: Option<String>,

    /// Prefix prepended to the release identifier
    #[arg(long)]
    pub release_prefix: Option<String>,

    /// Environment to register a deploy for
    #[arg(long)]
    pub environment: Option<String>,

    /// Space-separated sourcemap paths
    #[arg(long)]
    pub sourcemaps: Option<String>,

    /// Distribution label for uploaded sourcemaps
    #[arg(long)]
    pub dist: Option<String>,

    /// Finalize the release (true/false)
    #[arg(long)]
    pub finalize: Option<String>,

    /// Ignore a missing previous release commit (true/false)
    #[arg(long)]
    pub ignore_missing: Option<String>,

    /// Ignore an empty commit list (true/false)
    #[arg(long)]
    pub ignore_empty: Option<String>,

    /// Inject debug ids before uploading (true/false)
    #[arg(long)]
    pub inject: Option<String>,

    /// Deploy start: Unix timestamp or ISO 8601
    #[arg(long)]
    pub started_at: Option<String>,

    /// Commit association: auto, skip or manual
    #[arg(long)]
    pub set_commits: Option<String>,

    /// Manual commit range: "repo,current_commit,previous_commit"
    #[arg(long)]
    pub commit_range: Option<String>,

    /// Space-separated project slugs
    #[arg(long)]
    pub projects: Option<String>,

    /// URL prefix for uploaded sourcemaps
    #[arg(long)]
    pub url_prefix: Option<String>,

    /// Strip the common prefix of uploaded paths (true/false)
    #[arg(long)]
    pub strip_common_prefix: Option<String>,

    /// Directory to run in, relative to GITHUB_WORKSPACE
    #[arg(long)]
    pub working_directory: Option<String>,

    /// Disable telemetry (true/false)
    #[arg(long)]
    pub disable_telemetry: Option<String>,

    /// Use the network-free echo client (same as MOCK=1)
    #[arg(long)]
    pub mock: bool,

    /// Suppress progress output
    #[arg(long, short)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Option name / flag value pairs
    fn inputs(&self) -> [(&'static str, Option<&String>); 17] {
        [
            ("release", self.release.as_ref()),
            ("release_prefix", self.release_prefix.as_ref()),
            ("environment", self.environment.as_ref()),
            ("sourcemaps", self.sourcemaps.as_ref()),
            ("dist", self.dist.as_ref()),
            ("finalize", self.finalize.as_ref()),
            ("ignore_missing", self.ignore_missing.as_ref()),
            ("ignore_empty", self.ignore_empty.as_ref()),
            ("inject", self.inject.as_ref()),
            ("started_at", self.started_at.as_ref()),
            ("set_commits", self.set_commits.as_ref()),
            ("commit_range", self.commit_range.as_ref()),
            ("projects", self.projects.as_ref()),
            ("url_prefix", self.url_prefix.as_ref()),
            ("strip_common_prefix", self.strip_common_prefix.as_ref()),
            ("working_directory", self.working_directory.as_ref()),
            ("disable_telemetry", self.disable_telemetry.as_ref()),
        ]
    }

    /// Overlay flags on the environment's step inputs
    pub fn apply(&self, env: EnvConfig) -> EnvConfig {
        let env = self
            .inputs()
            .into_iter()
            .fold(env, |env, (name, value)| match value {
                Some(value) => env.with_input(name, value.as_str()),
                None => env,
            });

        if self.mock { env.with_var("MOCK", "true") } else { env }
    }
}
