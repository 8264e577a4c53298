//! Instrumentation around a release run.
//!
//! [`with_telemetry`] brackets the run in an `action.flow` span, records tags
//! and a session status, and always flushes at the end. Disabled telemetry runs
//! the same code path and only skips delivery. Nothing in here may change the
//! run's result.

mod transport;

pub use transport::{HttpTransport, TelemetryTransport, Transport};

use crate::env::EnvConfig;
use crate::error::{Result, TelemetryError};
use crate::options::{OptionResult, boolean_option};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::Instrument;
use url::Url;

/// Upper bound for delivering the session report
pub const FLUSH_TIMEOUT: Duration = Duration::from_millis(3000);

const SENTRY_SAAS_HOSTNAME: &str = "sentry.io";
const SESSION_ENVIRONMENT: &str = "production-sentry-release-action";

/// Telemetry switches
#[derive(Debug, Clone, Default)]
pub struct TelemetryOptions {
    /// Deliver reports on flush
    pub enabled: bool,
    /// Organization slug, used as user id and tag
    pub organization: Option<String>,
}

impl TelemetryOptions {
    /// Options derived from the environment
    pub fn from_env(env: &EnvConfig) -> OptionResult<Self> {
        Ok(Self {
            enabled: is_telemetry_enabled(env)?,
            organization: env.get("SENTRY_ORG"),
        })
    }
}

/// Whether `SENTRY_URL` points somewhere other than sentry.io
pub fn is_self_hosted(env: &EnvConfig) -> bool {
    let raw = env
        .get("SENTRY_URL")
        .unwrap_or_else(|| format!("https://{SENTRY_SAAS_HOSTNAME}"));

    match Url::parse(&raw) {
        Ok(url) => url.host_str() != Some(SENTRY_SAAS_HOSTNAME),
        Err(_) => true,
    }
}

/// Telemetry is on unless disabled or self-hosted
pub fn is_telemetry_enabled(env: &EnvConfig) -> OptionResult<bool> {
    Ok(!boolean_option(env, "disable_telemetry", false)? && !is_self_hosted(env))
}

/// Session outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Still running
    Ok,
    /// Ended normally
    Exited,
    /// Ended with an error
    Crashed,
}

/// Timing of one traced step
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// Step name
    pub name: String,
    /// Span operation
    pub op: &'static str,
    /// Start time
    pub started: DateTime<Utc>,
    /// End time
    pub finished: DateTime<Utc>,
    /// Whether the step succeeded
    pub ok: bool,
}

/// Everything delivered on flush
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    /// Version of this tool
    pub release: &'static str,
    /// Fixed session environment
    pub environment: &'static str,
    /// Outcome
    pub status: SessionStatus,
    /// Session start
    pub started: DateTime<Utc>,
    /// User id (organization)
    pub user: Option<String>,
    /// Tags at flush time
    pub tags: BTreeMap<String, String>,
    /// Traced steps
    pub steps: Vec<StepRecord>,
    /// Captured exception messages
    pub exceptions: Vec<String>,
}

#[derive(Debug)]
struct Scope {
    tags: BTreeMap<String, String>,
    user: Option<String>,
    status: SessionStatus,
    started: DateTime<Utc>,
    steps: Vec<StepRecord>,
    exceptions: Vec<String>,
}

/// Shared handle to the current session's scope
#[derive(Debug, Clone)]
pub struct Telemetry {
    enabled: bool,
    scope: Arc<Mutex<Scope>>,
}

impl Telemetry {
    /// Start a session
    pub fn new(options: &TelemetryOptions) -> Self {
        let telemetry = Self {
            enabled: options.enabled,
            scope: Arc::new(Mutex::new(Scope {
                tags: BTreeMap::new(),
                user: options.organization.clone(),
                status: SessionStatus::Ok,
                started: Utc::now(),
                steps: Vec::new(),
                exceptions: Vec::new(),
            })),
        };

        if let Some(org) = &options.organization {
            telemetry.set_tag("organization", org);
        }
        telemetry.set_tag("platform", std::env::consts::OS);
        telemetry.set_tag("arch", std::env::consts::ARCH);
        telemetry
    }

    /// Whether reports are delivered
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // A poisoned scope only means a panic elsewhere; the data is still usable.
    fn scope(&self) -> MutexGuard<'_, Scope> {
        self.scope.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Set a tag
    pub fn set_tag(&self, key: &str, value: impl ToString) {
        self.scope().tags.insert(key.to_string(), value.to_string());
    }

    /// Read a tag
    pub fn tag(&self, key: &str) -> Option<String> {
        self.scope().tags.get(key).cloned()
    }

    /// Set the `progress` tag
    pub fn update_progress(&self, step: &str) {
        tracing::debug!(progress = step, "progress");
        self.set_tag("progress", step);
    }

    /// Record an error message
    pub fn capture_exception(&self, message: impl Into<String>) {
        self.scope().exceptions.push(message.into());
    }

    /// Mark the session as crashed
    pub fn mark_crashed(&self) {
        self.scope().status = SessionStatus::Crashed;
    }

    /// Close the session. A session still `Ok` becomes `Exited`.
    pub fn end_session(&self) {
        let mut scope = self.scope();
        if scope.status == SessionStatus::Ok {
            scope.status = SessionStatus::Exited;
        }
    }

    /// Current session status
    pub fn status(&self) -> SessionStatus {
        self.scope().status
    }

    /// Snapshot of the session
    pub fn report(&self) -> SessionReport {
        let scope = self.scope();
        SessionReport {
            release: env!("CARGO_PKG_VERSION"),
            environment: SESSION_ENVIRONMENT,
            status: scope.status,
            started: scope.started,
            user: scope.user.clone(),
            tags: scope.tags.clone(),
            steps: scope.steps.clone(),
            exceptions: scope.exceptions.clone(),
        }
    }

    /// Run `step` in an `action.step` span and set `progress` to its name
    pub async fn trace_step<T, Fut>(&self, step: &str, future: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        self.update_progress(step);
        let started = Utc::now();
        let span = tracing::info_span!("step", step = step, op = "action.step");
        let result = future.instrument(span).await;

        self.scope().steps.push(StepRecord {
            name: step.to_string(),
            op: "action.step",
            started,
            finished: Utc::now(),
            ok: result.is_ok(),
        });
        result
    }
}

/// Run `callback` inside the telemetry session.
///
/// On error the session is marked crashed and the error captured; the error is
/// returned unchanged after the flush.
pub async fn with_telemetry<T, F, Fut, X>(
    options: &TelemetryOptions,
    transport: &X,
    callback: F,
) -> Result<T>
where
    F: FnOnce(Telemetry) -> Fut,
    Fut: Future<Output = Result<T>>,
    X: TelemetryTransport,
{
    let telemetry = Telemetry::new(options);
    let span = tracing::info_span!("sentry-release-action-execution", op = "action.flow");

    let run = telemetry.clone();
    let result = async move {
        run.update_progress("start");
        let result = callback(run.clone()).await;
        if result.is_ok() {
            run.update_progress("finished");
        }
        result
    }
    .instrument(span)
    .await;

    if let Err(e) = &result {
        telemetry.mark_crashed();
        telemetry.capture_exception(format!("Error during sentry-release-action execution: {e}"));
    }

    telemetry.end_session();
    safe_flush(&telemetry, transport).await;
    result
}

/// Deliver the session report. Failures are logged and dropped.
pub async fn safe_flush<X: TelemetryTransport>(telemetry: &Telemetry, transport: &X) {
    if !telemetry.is_enabled() {
        return;
    }

    let report = telemetry.report();
    let outcome = match tokio::time::timeout(FLUSH_TIMEOUT, transport.send(&report)).await {
        Ok(sent) => sent,
        Err(_) => Err(TelemetryError::Timeout(FLUSH_TIMEOUT.as_millis() as u64)),
    };

    if let Err(e) = outcome {
        log::debug!("{}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saas_is_not_self_hosted() {
        assert!(!is_self_hosted(&EnvConfig::default()));
        let env = EnvConfig::from_pairs([("SENTRY_URL", "https://sentry.io/")]);
        assert!(!is_self_hosted(&env));
    }

    #[test]
    fn test_custom_host_is_self_hosted() {
        let env = EnvConfig::from_pairs([("SENTRY_URL", "https://sentry.internal.example")]);
        assert!(is_self_hosted(&env));
    }

    #[test]
    fn test_disable_telemetry_option() {
        let env = EnvConfig::default().with_input("disable_telemetry", "true");
        assert_eq!(is_telemetry_enabled(&env), Ok(false));
        assert_eq!(is_telemetry_enabled(&EnvConfig::default()), Ok(true));

        let env = EnvConfig::default().with_input("disable_telemetry", "sure");
        assert!(is_telemetry_enabled(&env).is_err());
    }

    #[test]
    fn test_new_session_tags() {
        let telemetry = Telemetry::new(&TelemetryOptions {
            enabled: false,
            organization: Some("acme".to_string()),
        });
        assert_eq!(telemetry.tag("organization").as_deref(), Some("acme"));
        assert_eq!(telemetry.tag("platform").as_deref(), Some(std::env::consts::OS));
        assert_eq!(telemetry.tag("arch").as_deref(), Some(std::env::consts::ARCH));
        assert_eq!(telemetry.tag("runtime"), None);
        assert_eq!(telemetry.report().user.as_deref(), Some("acme"));
        assert_eq!(telemetry.status(), SessionStatus::Ok);
    }

    #[test]
    fn test_end_session_keeps_crash() {
        let telemetry = Telemetry::new(&TelemetryOptions::default());
        telemetry.mark_crashed();
        telemetry.end_session();
        assert_eq!(telemetry.status(), SessionStatus::Crashed);
    }
}
