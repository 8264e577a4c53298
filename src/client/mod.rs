//! Release-management service client.
//!
//! [`ReleaseApi`] is the capability the release sequence depends on. The only
//! required method is [`ReleaseApi::execute`]; the typed operations build the
//! external command line and delegate to it, so swapping `execute` swaps the
//! whole surface.

mod mock;
mod sentry_cli;

pub use mock::EchoClient;
pub use sentry_cli::{SentryCli, user_agent};

use crate::error::Result;
use crate::options::CommitRange;
use std::fmt;

/// Identifier of the release being operated on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseHandle(String);

impl ReleaseHandle {
    /// Wrap an identifier
    pub fn new(release: impl Into<String>) -> Self {
        Self(release.into())
    }

    /// Borrow the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Commit association request
#[derive(Debug, Clone, Copy)]
pub enum CommitAssociation<'a> {
    /// Infer commits from the local repository
    Auto {
        /// Tolerate a missing previous release commit
        ignore_missing: bool,
        /// Tolerate an empty commit list
        ignore_empty: bool,
    },
    /// Explicit range
    Manual(&'a CommitRange),
}

/// One sourcemap upload; the service accepts a single project per call
#[derive(Debug, Clone, Copy)]
pub struct SourcemapUpload<'a> {
    /// Paths to upload
    pub include: &'a [String],
    /// Target project
    pub project: &'a str,
    /// Distribution label
    pub dist: Option<&'a str>,
    /// URL prefix
    pub url_prefix: Option<&'a str>,
    /// Strip the common path prefix
    pub strip_common_prefix: bool,
}

/// Deploy event
#[derive(Debug, Clone, Copy)]
pub struct Deploy<'a> {
    /// Environment name
    pub environment: &'a str,
    /// Start time, seconds since the epoch
    pub started: Option<i64>,
}

/// Operations offered by the release-management service
#[allow(async_fn_in_trait)]
pub trait ReleaseApi {
    /// Run a raw command against the service.
    ///
    /// `live` streams output to the console instead of capturing it.
    async fn execute(&self, args: Vec<String>, live: bool) -> Result<String>;

    /// Create a release for the given projects
    async fn new_release(&self, release: &ReleaseHandle, projects: &[String]) -> Result<()> {
        let mut args = argv(["releases", "new", release.as_str()]);
        for project in projects {
            args.extend(["-p".to_string(), project.clone()]);
        }
        self.execute(args, false).await?;
        Ok(())
    }

    /// Associate commits with the release
    async fn set_commits(
        &self,
        release: &ReleaseHandle,
        association: CommitAssociation<'_>,
    ) -> Result<()> {
        let mut args = argv(["releases", "set-commits", release.as_str()]);
        match association {
            CommitAssociation::Auto {
                ignore_missing,
                ignore_empty,
            } => {
                args.push("--auto".to_string());
                if ignore_missing {
                    args.push("--ignore-missing".to_string());
                }
                if ignore_empty {
                    args.push("--ignore-empty".to_string());
                }
            }
            CommitAssociation::Manual(range) => {
                args.push("--commit".to_string());
                args.push(format!(
                    "{}@{}..{}",
                    range.repo, range.previous_commit, range.current_commit
                ));
            }
        }
        self.execute(args, false).await?;
        Ok(())
    }

    /// Embed debug ids into built artifacts
    async fn inject_debug_ids(&self, paths: &[String]) -> Result<()> {
        let mut args = argv(["sourcemaps", "inject"]);
        args.extend(paths.iter().cloned());
        self.execute(args, true).await?;
        Ok(())
    }

    /// Upload sourcemaps for one project
    async fn upload_sourcemaps(
        &self,
        release: &ReleaseHandle,
        upload: SourcemapUpload<'_>,
    ) -> Result<()> {
        let mut args = argv([
            "sourcemaps",
            "upload",
            "--release",
            release.as_str(),
            "-p",
            upload.project,
        ]);
        if let Some(dist) = upload.dist {
            args.extend(["--dist".to_string(), dist.to_string()]);
        }
        if let Some(url_prefix) = upload.url_prefix {
            args.extend(["--url-prefix".to_string(), url_prefix.to_string()]);
        }
        if upload.strip_common_prefix {
            args.push("--strip-common-prefix".to_string());
        }
        args.extend(upload.include.iter().cloned());
        self.execute(args, true).await?;
        Ok(())
    }

    /// Register a deploy of the release
    async fn new_deploy(&self, release: &ReleaseHandle, deploy: Deploy<'_>) -> Result<()> {
        let mut args = argv([
            "releases",
            "deploys",
            release.as_str(),
            "new",
            "-e",
            deploy.environment,
        ]);
        if let Some(started) = deploy.started {
            args.extend(["--started".to_string(), started.to_string()]);
        }
        self.execute(args, false).await?;
        Ok(())
    }

    /// Close the release
    async fn finalize(&self, release: &ReleaseHandle) -> Result<()> {
        self.execute(argv(["releases", "finalize", release.as_str()]), false)
            .await?;
        Ok(())
    }

    /// Ask the service to propose a release identifier
    async fn propose_version(&self) -> Result<String> {
        let output = self
            .execute(argv(["releases", "propose-version"]), false)
            .await?;
        Ok(output.trim().to_string())
    }
}

fn argv<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}
