//! Error types for sentry_release_action operations.
//!
//! Configuration problems are always detected before the first call to the
//! release service. Service failures are propagated unchanged. Telemetry
//! failures have their own type and never convert into [`ReleaseError`].

use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Malformed or missing option / environment value
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failure reported by the release-management service
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The `working_directory` target could not be entered
    #[error("Cannot switch to working_directory {}: {source}", path.display())]
    WorkingDirectory {
        /// Directory that was requested
        path: std::path::PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors. Messages name the offending option and the expected format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Boolean option with a value other than true/false/1/0
    #[error("{name} is not a boolean")]
    NotABoolean {
        /// Option name
        name: String,
    },

    /// Timestamp option that is neither a Unix timestamp nor ISO 8601
    #[error("{name} not in valid format. Unix timestamp or ISO 8601 date expected")]
    InvalidTimestamp {
        /// Option name
        name: String,
    },

    /// Integer timestamp that does not fit in 64 bits
    #[error("{name} is out of range. Unix timestamp in seconds expected")]
    TimestampOutOfRange {
        /// Option name
        name: String,
    },

    /// Unknown `set_commits` mode
    #[error("set_commits must be \"auto\" or \"skip\" or \"manual\"")]
    InvalidSetCommits {
        /// Value that was supplied
        value: String,
    },

    /// Commit range requested while `set_commits` is not `manual`
    #[error("A commit range is only used when set_commits is \"manual\" (got \"{mode}\")")]
    CommitRangeNotManual {
        /// Active mode
        mode: String,
    },

    /// Manual commit range with a missing field
    #[error(
        "set_commits is \"manual\" but the commit range is missing {field}. Expected commit_range: \"repo,current_commit,previous_commit\""
    )]
    IncompleteCommitRange {
        /// Missing field name
        field: &'static str,
    },

    /// Required environment variable not set
    #[error("Environment variable {variable} is missing {description}")]
    MissingEnvironment {
        /// Variable name
        variable: &'static str,
        /// What the variable should hold
        description: &'static str,
    },

    /// Neither the `projects` option nor `SENTRY_PROJECT` are set
    #[error(
        "Environment variable SENTRY_PROJECT is missing a project slug and no projects are specified with the \"projects\" option"
    )]
    NoProjects,
}

/// Errors raised while talking to the release-management service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The external client executable could not be located
    #[error("sentry-cli executable not found: {reason}")]
    ClientNotFound {
        /// Reason for the error
        reason: String,
    },

    /// The external client could not be started
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        /// Command that failed
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The external client exited unsuccessfully
    #[error("Command '{command}' failed ({status}): {stderr}")]
    CommandFailed {
        /// Command that failed
        command: String,
        /// Exit status description
        status: String,
        /// Captured error output
        stderr: String,
    },
}

/// Instrumentation failures. Always swallowed by the telemetry wrapper.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Serializing the session report failed
    #[error("Failed to serialize session report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Sending the report failed
    #[error("Failed to send session report: {0}")]
    Transport(#[from] reqwest::Error),

    /// Flush did not complete in time
    #[error("Telemetry flush timed out after {0} ms")]
    Timeout(u64),
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Config(ConfigError::MissingEnvironment { variable, .. }) => vec![
                format!("Set {} in the step's `env:` block", variable),
                "Store credentials as repository secrets, e.g. ${{ secrets.SENTRY_AUTH_TOKEN }}"
                    .to_string(),
            ],
            ReleaseError::Config(ConfigError::NoProjects) => vec![
                "Set SENTRY_PROJECT in the step's `env:` block".to_string(),
                "Or pass a space-separated list with the `projects` input".to_string(),
            ],
            ReleaseError::Config(ConfigError::IncompleteCommitRange { .. }) => vec![
                "Pass commit_range: \"<repo>,<current_commit>,<previous_commit>\"".to_string(),
            ],
            ReleaseError::Config(
                ConfigError::InvalidTimestamp { .. } | ConfigError::TimestampOutOfRange { .. },
            ) => vec![
                "Use seconds since the epoch (1500000000) or ISO 8601 (2017-07-13T19:40:00-07:00)"
                    .to_string(),
            ],
            ReleaseError::WorkingDirectory { .. } => vec![
                "working_directory is relative to GITHUB_WORKSPACE; check that the directory exists after checkout"
                    .to_string(),
            ],
            ReleaseError::Service(ServiceError::ClientNotFound { .. }) => vec![
                "Install sentry-cli: curl -sL https://sentry.io/get-cli/ | bash".to_string(),
                "Or point SENTRY_CLI_PATH at an existing binary".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Whether this error was raised before any call to the release service
    pub fn is_configuration(&self) -> bool {
        matches!(self, ReleaseError::Config(_))
    }
}
