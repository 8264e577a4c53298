//! Where flushed session reports go.

use super::SessionReport;
use crate::env::EnvConfig;
use crate::error::TelemetryError;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

/// Destination for session reports
#[allow(async_fn_in_trait)]
pub trait TelemetryTransport {
    /// Deliver one report
    async fn send(&self, report: &SessionReport) -> Result<(), TelemetryError>;
}

/// POSTs reports as JSON
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for `endpoint`
    pub fn new(endpoint: Url) -> Result<Self, TelemetryError> {
        let client = reqwest::Client::builder()
            .user_agent(crate::client::user_agent())
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, endpoint })
    }
}

impl TelemetryTransport for HttpTransport {
    async fn send(&self, report: &SessionReport) -> Result<(), TelemetryError> {
        let body = serde_json::to_vec(report)?;
        self.client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Transport selected from the environment
#[derive(Debug, Clone)]
pub enum Transport {
    /// Send to `SENTRY_RELEASE_TELEMETRY_URL`
    Http(HttpTransport),
    /// No endpoint configured
    Discard,
}

impl Transport {
    /// `Http` when `SENTRY_RELEASE_TELEMETRY_URL` holds a valid URL
    pub fn from_env(env: &EnvConfig) -> Self {
        let Some(raw) = env.get("SENTRY_RELEASE_TELEMETRY_URL") else {
            return Transport::Discard;
        };

        match Url::parse(&raw).map_err(|e| e.to_string()).and_then(|endpoint| {
            HttpTransport::new(endpoint).map_err(|e| e.to_string())
        }) {
            Ok(transport) => Transport::Http(transport),
            Err(e) => {
                log::debug!("Telemetry endpoint unusable, discarding reports: {}", e);
                Transport::Discard
            }
        }
    }
}

impl TelemetryTransport for Transport {
    async fn send(&self, report: &SessionReport) -> Result<(), TelemetryError> {
        match self {
            Transport::Http(http) => http.send(report).await,
            Transport::Discard => Ok(()),
        }
    }
}
