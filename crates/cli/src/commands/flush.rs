//! `flush` command implementation.

use anyhow::{Context, Result};
use contracts::RecordStore;
use dispatcher::{create_dispatcher, FlushOutcome};
use tracing::info;

use super::load_config;
use crate::cli::FlushArgs;
use crate::error::CliError;

/// Execute the `flush` command
///
/// Mainly useful with a file store, to drain records a previous run left behind.
pub async fn run_flush(args: &FlushArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let dispatcher =
        create_dispatcher(&config, args.dry_run).context("Failed to create dispatcher")?;

    info!(store = %dispatcher.store().name(), dry_run = args.dry_run, "Flushing stored events");
    let outcome = dispatcher.flush().await.context("Flush failed")?;

    match outcome {
        FlushOutcome::Empty => println!("Nothing to flush"),
        FlushOutcome::Delivered { events } => println!("Delivered {events} event(s)"),
        FlushOutcome::SendFailed { events } => {
            println!("Send failed; {events} event(s) remain stored");
            return Err(CliError::Undelivered {
                failed: 1,
                total: 1,
            }
            .into());
        }
    }
    Ok(())
}
