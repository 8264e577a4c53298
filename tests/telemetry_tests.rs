use sentry_release_action::error::{ServiceError, TelemetryError};
use sentry_release_action::telemetry::{
    SessionReport, SessionStatus, TelemetryOptions, TelemetryTransport, with_telemetry,
};
use sentry_release_action::{ReleaseError, Result};
use std::sync::Mutex;

#[derive(Default)]
struct CapturingTransport {
    reports: Mutex<Vec<SessionReport>>,
}

impl TelemetryTransport for CapturingTransport {
    async fn send(&self, report: &SessionReport) -> std::result::Result<(), TelemetryError> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

struct BrokenTransport;

impl TelemetryTransport for BrokenTransport {
    async fn send(&self, _report: &SessionReport) -> std::result::Result<(), TelemetryError> {
        Err(TelemetryError::Timeout(0))
    }
}

fn enabled() -> TelemetryOptions {
    TelemetryOptions {
        enabled: true,
        organization: Some("acme".to_string()),
    }
}

fn service_failure() -> ReleaseError {
    ServiceError::CommandFailed {
        command: "sentry-cli releases new v1".to_string(),
        status: "exit status: 1".to_string(),
        stderr: "401 Unauthorized".to_string(),
    }
    .into()
}

#[tokio::test]
async fn test_success_reports_finished_session() {
    let transport = CapturingTransport::default();
    let value = with_telemetry(&enabled(), &transport, |telemetry| async move {
        telemetry
            .trace_step("set-commits", async { Ok::<_, ReleaseError>(()) })
            .await?;
        Ok(7)
    })
    .await
    .unwrap();
    assert_eq!(value, 7);

    let reports = transport.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.status, SessionStatus::Exited);
    assert_eq!(report.tags.get("progress").map(String::as_str), Some("finished"));
    assert_eq!(report.tags.get("organization").map(String::as_str), Some("acme"));
    assert_eq!(report.user.as_deref(), Some("acme"));
    assert_eq!(report.steps.len(), 1);
    assert_eq!(report.steps[0].name, "set-commits");
    assert_eq!(report.steps[0].op, "action.step");
    assert!(report.steps[0].ok);
}

#[tokio::test]
async fn test_failure_marks_crash_and_returns_original_error() {
    let transport = CapturingTransport::default();
    let result: Result<()> = with_telemetry(&enabled(), &transport, |telemetry| async move {
        telemetry
            .trace_step("finalizing-release", async { Err(service_failure()) })
            .await
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), service_failure().to_string());

    let reports = transport.reports.lock().unwrap();
    let report = &reports[0];
    assert_eq!(report.status, SessionStatus::Crashed);
    assert_eq!(
        report.tags.get("progress").map(String::as_str),
        Some("finalizing-release")
    );
    assert_eq!(report.exceptions.len(), 1);
    assert!(report.exceptions[0].contains("401 Unauthorized"));
    assert!(!report.steps[0].ok);
}

#[tokio::test]
async fn test_flush_failure_is_swallowed() {
    let ok = with_telemetry(&enabled(), &BrokenTransport, |_| async { Ok("done") }).await;
    assert_eq!(ok.unwrap(), "done");

    let failed: Result<()> =
        with_telemetry(&enabled(), &BrokenTransport, |_| async { Err(service_failure()) }).await;
    assert!(matches!(
        failed.unwrap_err(),
        ReleaseError::Service(ServiceError::CommandFailed { .. })
    ));
}

#[tokio::test]
async fn test_disabled_telemetry_never_sends() {
    let transport = CapturingTransport::default();
    let options = TelemetryOptions {
        enabled: false,
        organization: None,
    };

    let result: Result<()> =
        with_telemetry(&options, &transport, |_| async { Err(service_failure()) }).await;
    assert!(result.is_err());
    assert!(transport.reports.lock().unwrap().is_empty());
}
