//! Release phases that run after the release has been created.
//!
//! Phases run strictly in order; the first failure aborts the rest.

use crate::client::{CommitAssociation, Deploy, ReleaseApi, SourcemapUpload};
use crate::error::Result;
use crate::options::Commits;
use futures::future::try_join_all;

use super::context::ReleasePhaseContext;

/// Run every phase in order
pub async fn execute_phases<C: ReleaseApi>(ctx: &ReleasePhaseContext<'_, C>) -> Result<()> {
    set_commits(ctx).await?;
    sourcemaps(ctx).await?;
    add_environment(ctx).await?;
    finalize(ctx).await
}

/// Associate commits according to the configured mode
async fn set_commits<C: ReleaseApi>(ctx: &ReleasePhaseContext<'_, C>) -> Result<()> {
    let config = ctx.config;
    let mode = config.commits.mode();
    ctx.telemetry.set_tag("set-commits", mode);

    let association = match &config.commits {
        Commits::Skip => return Ok(()),
        Commits::Manual(range) => CommitAssociation::Manual(range),
        Commits::Auto => CommitAssociation::Auto {
            ignore_missing: config.ignore_missing,
            ignore_empty: config.ignore_empty,
        },
    };

    ctx.output.progress(&format!("Setting commits ({})", mode));
    ctx.telemetry
        .trace_step("set-commits", async {
            log::debug!("Setting commits with option '{}'", mode);
            ctx.client.set_commits(ctx.release, association).await
        })
        .await
}

/// Inject debug ids and upload sourcemaps, one upload per project
async fn sourcemaps<C: ReleaseApi>(ctx: &ReleasePhaseContext<'_, C>) -> Result<()> {
    let config = ctx.config;
    ctx.telemetry.set_tag("sourcemaps", !config.sourcemaps.is_empty());
    ctx.telemetry.set_tag("inject", config.inject);

    if config.sourcemaps.is_empty() {
        return Ok(());
    }

    if config.inject {
        ctx.output.progress("Injecting debug ids");
        ctx.telemetry
            .trace_step("inject-debug-ids", async {
                log::debug!("Injecting Debug IDs");
                ctx.client.inject_debug_ids(&config.sourcemaps).await
            })
            .await?;
    }

    ctx.output.progress(&format!(
        "Uploading sourcemaps for {} project(s)",
        config.projects.len()
    ));
    ctx.telemetry
        .trace_step("upload-sourcemaps", async {
            log::debug!("Adding sourcemaps");
            let uploads = config.projects.iter().map(|project| {
                ctx.client.upload_sourcemaps(
                    ctx.release,
                    SourcemapUpload {
                        include: &config.sourcemaps,
                        project: project.as_str(),
                        dist: config.dist.as_deref(),
                        url_prefix: config.url_prefix.as_deref(),
                        strip_common_prefix: config.strip_common_prefix,
                    },
                )
            });
            try_join_all(uploads).await?;

            ctx.telemetry.set_tag("sourcemaps-uploaded", true);
            Ok(())
        })
        .await
}

/// Register a deploy when an environment is configured
async fn add_environment<C: ReleaseApi>(ctx: &ReleasePhaseContext<'_, C>) -> Result<()> {
    let Some(environment) = ctx.config.environment.as_deref() else {
        return Ok(());
    };

    ctx.output.progress(&format!("Adding deploy to {}", environment));
    ctx.telemetry
        .trace_step("add-environment", async {
            log::debug!("Adding deploy to release");
            ctx.client
                .new_deploy(
                    ctx.release,
                    Deploy {
                        environment,
                        started: ctx.config.started_at,
                    },
                )
                .await
        })
        .await
}

async fn finalize<C: ReleaseApi>(ctx: &ReleasePhaseContext<'_, C>) -> Result<()> {
    ctx.telemetry.set_tag("finalize", ctx.config.finalize);

    if !ctx.config.finalize {
        return Ok(());
    }

    ctx.output.progress(&format!("Finalizing release {}", ctx.release));
    ctx.telemetry
        .trace_step("finalizing-release", async {
            log::debug!("Finalizing the release");
            ctx.client.finalize(ctx.release).await?;

            ctx.telemetry.set_tag("finalized", true);
            Ok(())
        })
        .await
}
