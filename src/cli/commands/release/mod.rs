//! Release command execution module.
//!
//! Validates every option, then creates the release and runs the phases in
//! order inside a telemetry session.

mod context;
mod guard;
mod phases;

pub use context::ReleasePhaseContext;
pub use guard::WorkingDirectoryGuard;

use crate::cli::OutputManager;
use crate::client::{ReleaseApi, ReleaseHandle};
use crate::env::EnvConfig;
use crate::error::Result;
use crate::options::RunConfig;
use crate::telemetry::{Telemetry, TelemetryOptions, TelemetryTransport, with_telemetry};

/// Run the release sequence inside a telemetry session
pub async fn execute_release<C, X>(
    env: &EnvConfig,
    client: &C,
    telemetry_options: &TelemetryOptions,
    transport: &X,
    output: &OutputManager,
) -> Result<ReleaseHandle>
where
    C: ReleaseApi,
    X: TelemetryTransport,
{
    with_telemetry(telemetry_options, transport, |telemetry| async move {
        perform_release(env, client, &telemetry, output).await
    })
    .await
}

/// Run the release sequence and return the release that was created.
///
/// Options are validated before anything else happens; a configuration error
/// means no command was sent to the service.
pub async fn perform_release<C: ReleaseApi>(
    env: &EnvConfig,
    client: &C,
    telemetry: &Telemetry,
    output: &OutputManager,
) -> Result<ReleaseHandle> {
    let config = RunConfig::resolve(env)?;

    let _guard = if config.working_directory.as_os_str().is_empty() {
        None
    } else {
        Some(WorkingDirectoryGuard::enter(&config.working_directory)?)
    };

    let release = config.release.resolve(client).await?;

    match config.projects.as_slice() {
        [project] => telemetry.set_tag("project", project),
        projects => telemetry.set_tag("projects", projects.join(",")),
    }

    log::debug!("Release version is {}", release);
    output.progress(&format!("Creating release {}", release));
    client.new_release(&release, &config.projects).await?;

    let ctx = ReleasePhaseContext {
        config: &config,
        client,
        telemetry,
        release: &release,
        output,
    };
    phases::execute_phases(&ctx).await?;

    log::debug!("Done");
    Ok(release)
}
