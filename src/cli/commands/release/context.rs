//! Everything a release phase needs.

use crate::cli::OutputManager;
use crate::client::{ReleaseApi, ReleaseHandle};
use crate::options::RunConfig;
use crate::telemetry::Telemetry;

/// Context for executing release phases with all required dependencies
pub struct ReleasePhaseContext<'a, C: ReleaseApi> {
    /// Validated options
    pub config: &'a RunConfig,
    /// Release-management service
    pub client: &'a C,
    /// Session scope for tags and step spans
    pub telemetry: &'a Telemetry,
    /// Release created in this run
    pub release: &'a ReleaseHandle,
    /// Terminal output
    pub output: &'a OutputManager,
}
