//! Release client backed by the `sentry-cli` executable.

use super::ReleaseApi;
use crate::env::EnvConfig;
use crate::error::{Result, ServiceError};
use std::path::PathBuf;
use std::process::Stdio;

/// Variables forwarded to the child process when present
const FORWARDED_VARS: [&str; 4] = ["SENTRY_ORG", "SENTRY_AUTH_TOKEN", "SENTRY_URL", "SENTRY_LOG_LEVEL"];

/// User-Agent marker reported to the service
pub fn user_agent() -> String {
    format!("sentry-release-action/{}", env!("CARGO_PKG_VERSION"))
}

/// Runs release commands through `sentry-cli`
#[derive(Debug, Clone)]
pub struct SentryCli {
    binary: std::result::Result<PathBuf, String>,
    child_env: Vec<(String, String)>,
}

impl SentryCli {
    /// Locate the executable (`SENTRY_CLI_PATH`, then `PATH`).
    ///
    /// A missing executable is reported by the first command, not here, so
    /// option validation still runs first.
    pub fn new(env: &EnvConfig) -> Self {
        let binary = match env.get("SENTRY_CLI_PATH") {
            Some(path) => Ok(PathBuf::from(path)),
            None => which::which("sentry-cli").map_err(|e| e.to_string()),
        };

        let mut child_env = vec![("SENTRY_PIPELINE".to_string(), user_agent())];
        child_env.extend(
            FORWARDED_VARS
                .iter()
                .filter_map(|key| env.get(key).map(|value| (key.to_string(), value))),
        );

        Self { binary, child_env }
    }
}

impl ReleaseApi for SentryCli {
    async fn execute(&self, args: Vec<String>, live: bool) -> Result<String> {
        let binary = self.binary.as_ref().map_err(|reason| ServiceError::ClientNotFound {
            reason: reason.clone(),
        })?;
        let command_line = format!("sentry-cli {}", args.join(" "));
        log::debug!("Running {}", command_line);

        let mut command = tokio::process::Command::new(binary);
        command
            .args(&args)
            .envs(self.child_env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null());

        if live {
            let status = command.status().await.map_err(|source| ServiceError::Spawn {
                command: command_line.clone(),
                source,
            })?;

            if !status.success() {
                return Err(ServiceError::CommandFailed {
                    command: command_line,
                    status: status.to_string(),
                    stderr: "see output above".to_string(),
                }
                .into());
            }
            return Ok(String::new());
        }

        let output = command.output().await.map_err(|source| ServiceError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(ServiceError::CommandFailed {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
