//! Commit association mode and the manual commit range.

use super::OptionResult;
use crate::env::EnvConfig;
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// How commits are associated with the release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetCommitsMode {
    /// Let the release service infer the commits
    #[default]
    Auto,
    /// No commit association
    Skip,
    /// Explicit repository / commit / previous commit
    Manual,
}

impl SetCommitsMode {
    /// Lower-case option value
    pub fn as_str(&self) -> &'static str {
        match self {
            SetCommitsMode::Auto => "auto",
            SetCommitsMode::Skip => "skip",
            SetCommitsMode::Manual => "manual",
        }
    }
}

impl fmt::Display for SetCommitsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetCommitsMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "auto" => Ok(SetCommitsMode::Auto),
            "skip" => Ok(SetCommitsMode::Skip),
            "manual" => Ok(SetCommitsMode::Manual),
            _ => Err(ConfigError::InvalidSetCommits {
                value: value.to_string(),
            }),
        }
    }
}

/// Explicit commit range for `manual` mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    /// Repository name as configured in the release service
    pub repo: String,
    /// Commit the release was built from
    pub current_commit: String,
    /// Commit of the previous release
    pub previous_commit: String,
}

/// Commit association resolved for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commits {
    /// Infer commits upstream
    Auto,
    /// Do not associate commits
    Skip,
    /// Associate the given range
    Manual(CommitRange),
}

impl Commits {
    /// The mode this association was resolved from
    pub fn mode(&self) -> SetCommitsMode {
        match self {
            Commits::Auto => SetCommitsMode::Auto,
            Commits::Skip => SetCommitsMode::Skip,
            Commits::Manual(_) => SetCommitsMode::Manual,
        }
    }

    /// Resolve mode and, for `manual`, the range
    pub fn resolve(env: &EnvConfig) -> OptionResult<Self> {
        match set_commits_option(env)? {
            SetCommitsMode::Auto => Ok(Commits::Auto),
            SetCommitsMode::Skip => Ok(Commits::Skip),
            SetCommitsMode::Manual => Ok(Commits::Manual(commit_range(
                env,
                SetCommitsMode::Manual,
            )?)),
        }
    }
}

/// Read `set_commits`, defaulting to `auto`
pub fn set_commits_option(env: &EnvConfig) -> OptionResult<SetCommitsMode> {
    env.input("set_commits")
        .map(str::parse::<SetCommitsMode>)
        .unwrap_or(Ok(SetCommitsMode::Auto))
}

/// Read the manual commit range.
///
/// `commit_range` ("repo,current,previous") wins over the discrete `repo`,
/// `commit` and `previous_commit` inputs. Only valid in `manual` mode.
pub fn commit_range(env: &EnvConfig, mode: SetCommitsMode) -> OptionResult<CommitRange> {
    if mode != SetCommitsMode::Manual {
        return Err(ConfigError::CommitRangeNotManual {
            mode: mode.to_string(),
        });
    }

    let fields: [Option<String>; 3] = match env.input("commit_range") {
        Some(range) => {
            let mut parts = range
                .split(',')
                .map(|part| Some(part.trim().to_string()).filter(|part| !part.is_empty()));
            [
                parts.next().flatten(),
                parts.next().flatten(),
                parts.next().flatten(),
            ]
        }
        None => ["repo", "commit", "previous_commit"].map(|name| env.input(name).map(str::to_string)),
    };

    let [repo, current_commit, previous_commit] = fields;
    Ok(CommitRange {
        repo: repo.ok_or(ConfigError::IncompleteCommitRange { field: "repo" })?,
        current_commit: current_commit
            .ok_or(ConfigError::IncompleteCommitRange { field: "commit" })?,
        previous_commit: previous_commit.ok_or(ConfigError::IncompleteCommitRange {
            field: "previous_commit",
        })?,
    })
}
