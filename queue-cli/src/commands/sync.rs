//! Run one sync pass.

use anyhow::{Context, Result};
use pitstop_queue_client::{Dispatcher, HttpDispatcher, MockDispatcher};
use pitstop_queue_core::{SkipReason, SyncReport};

use super::QueueContext;

/// Run the sync command.
pub async fn run(ctx: &QueueContext, offline: bool, use_mock: bool) -> Result<()> {
    let report = if use_mock {
        sync_with(ctx, MockDispatcher::new(), offline).await?
    } else {
        let dispatcher = HttpDispatcher::new(&ctx.config.remote)
            .context("Failed to create HTTP dispatcher")?;
        sync_with(ctx, dispatcher, offline).await?
    };

    print_report(&report);
    Ok(())
}

async fn sync_with<D: Dispatcher + 'static>(
    ctx: &QueueContext,
    dispatcher: D,
    offline: bool,
) -> Result<SyncReport> {
    let queue = ctx.open_queue(dispatcher, !offline).await?;
    let report = queue.sync().await.context("Sync failed")?;
    tracing::info!(
        attempted = report.attempted,
        synced = report.synced,
        retried = report.retried,
        failed = report.failed,
        pruned = report.pruned,
        "Sync command finished"
    );
    Ok(report)
}

fn print_report(report: &SyncReport) {
    match report.skipped {
        Some(SkipReason::Offline) => {
            println!("Offline, nothing sent. Queued actions are kept for the next sync.");
            return;
        }
        Some(SkipReason::AlreadyRunning) => {
            println!("A sync is already running.");
            return;
        }
        None => {}
    }

    if report.attempted == 0 {
        println!("Nothing to sync.");
    } else {
        println!("Synced {} of {} queued actions.", report.synced, report.attempted);
        if report.retried > 0 {
            println!("{} will be retried on the next sync.", report.retried);
        }
        if report.has_failures() {
            println!(
                "{} could not be synced and will not be retried.",
                report.failed
            );
        }
    }

    if report.pruned > 0 {
        println!("Removed {} expired records.", report.pruned);
    }
    if report.storage_errors > 0 {
        println!(
            "Warning: {} results could not be saved locally.",
            report.storage_errors
        );
    }
}
