//! `send` command implementation.

use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{Event, RecordStore};
use dispatcher::record::now_ms;
use dispatcher::{create_dispatcher, FlushOutcome};
use observability::FlushStatsAggregator;
use tracing::{info, warn};

use super::load_config;
use crate::cli::SendArgs;
use crate::error::CliError;

/// Execute the `send` command
pub async fn run_send(args: &SendArgs) -> Result<()> {
    let config = load_config(&args.config)?;

    if args.metrics_port > 0 {
        observability::init_metrics_only(args.metrics_port)
            .context("Failed to start metrics exporter")?;
        info!(port = args.metrics_port, "Metrics exporter listening");
    }

    let dispatcher =
        create_dispatcher(&config, args.dry_run).context("Failed to create dispatcher")?;
    let events = build_events(args, now_ms());
    info!(
        events = events.len(),
        store = %dispatcher.store().name(),
        dry_run = args.dry_run,
        "Dispatching events"
    );

    let handles: Vec<_> = events
        .into_iter()
        .map(|event| (Instant::now(), dispatcher.dispatch(event)))
        .collect();

    let mut stats = FlushStatsAggregator::new();
    for (started, handle) in handles {
        let outcome = handle
            .await
            .context("Dispatch task aborted")?
            .context("Dispatch failed")?;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        if let FlushOutcome::SendFailed { events } = outcome {
            warn!(events, "Flush failed, events kept in store");
        }
        stats.update(outcome.label(), outcome.events(), latency_ms);
    }

    let summary = stats.summary();
    println!("{summary}");

    let metrics = dispatcher.metrics();
    info!(
        dispatched = metrics.dispatched,
        delivered = metrics.events_delivered,
        send_failures = metrics.send_failures,
        "Send complete"
    );

    if summary.failed_flushes > 0 {
        return Err(CliError::Undelivered {
            failed: summary.failed_flushes,
            total: summary.total_flushes,
        }
        .into());
    }
    Ok(())
}

/// Build the events to dispatch, generating ids from `seed` when none are given
fn build_events(args: &SendArgs, seed: i64) -> Vec<Event> {
    let ids: Vec<String> = if args.event_ids.is_empty() {
        (0..args.count).map(|i| format!("cli-{seed}-{i}")).collect()
    } else {
        args.event_ids.clone()
    };

    ids.into_iter()
        .map(|id| {
            let mut event = Event::new(id);
            if let Some(path) = &args.path {
                event = event.with_path(path.clone());
            }
            if let Some(view_id) = &args.view_id {
                event = event.with_view_id(view_id.clone());
            }
            event
        })
        .collect()
}
