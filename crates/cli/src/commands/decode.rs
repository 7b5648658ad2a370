//! `decode` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::DateTime;
use codec::decode_struct;
use contracts::{Event, NativeAppSubmission};
use dispatcher::record::decode_record;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cli::{DecodeArgs, PayloadKind};
use crate::error::CliError;

/// One decoded input file
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Decoded {
    Record {
        source: PathBuf,
        stored_at_ms: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        stored_at: Option<String>,
        event: Event,
    },
    Event {
        source: PathBuf,
        event: Event,
    },
    Submission {
        source: PathBuf,
        submission: NativeAppSubmission,
    },
}

/// Execute the `decode` command
pub fn run_decode(args: &DecodeArgs) -> Result<()> {
    let inputs = collect_inputs(&args.input, args.kind)?;
    debug!(files = inputs.len(), "Decoding inputs");

    let mut decoded = Vec::with_capacity(inputs.len());
    for path in inputs {
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        match decode_file(path.clone(), Bytes::from(bytes), args.kind) {
            Ok(item) => decoded.push(item),
            // A bad file inside a store directory should not hide the rest
            Err(e) if args.input.is_dir() => warn!(error = %e, "Skipping undecodable record"),
            Err(e) => return Err(e.into()),
        }
    }

    if args.json {
        let json =
            serde_json::to_string_pretty(&decoded).context("Failed to serialize decoded output")?;
        println!("{}", json);
    } else {
        for item in &decoded {
            print_decoded(item);
        }
    }
    Ok(())
}

/// A single file, or every visible file of a file-store directory
fn collect_inputs(input: &Path, kind: PayloadKind) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }
    if kind != PayloadKind::Record {
        anyhow::bail!(
            "{} is a directory; only `--kind record` accepts a store directory",
            input.display()
        );
    }

    let mut paths = Vec::new();
    for entry in
        fs::read_dir(input).with_context(|| format!("Failed to list {}", input.display()))?
    {
        let entry = entry?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden && entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

fn decode_file(path: PathBuf, bytes: Bytes, kind: PayloadKind) -> Result<Decoded, CliError> {
    match kind {
        PayloadKind::Record => {
            let (stored_at_ms, event) =
                decode_record(bytes).map_err(|e| CliError::decode(&path, "record", e))?;
            Ok(Decoded::Record {
                stored_at: DateTime::from_timestamp_millis(stored_at_ms)
                    .map(|t| t.to_rfc3339()),
                source: path,
                stored_at_ms,
                event,
            })
        }
        PayloadKind::Event => {
            let event: Event =
                decode_struct(bytes).map_err(|e| CliError::decode(&path, "event", e))?;
            Ok(Decoded::Event {
                source: path,
                event,
            })
        }
        PayloadKind::Submission => {
            let submission: NativeAppSubmission =
                decode_struct(bytes).map_err(|e| CliError::decode(&path, "submission", e))?;
            Ok(Decoded::Submission {
                source: path,
                submission,
            })
        }
    }
}

fn print_decoded(item: &Decoded) {
    match item {
        Decoded::Record {
            source,
            stored_at_ms,
            stored_at,
            event,
        } => {
            println!("{}", source.display());
            println!(
                "  Stored at: {} ({})",
                stored_at.as_deref().unwrap_or("-"),
                stored_at_ms
            );
            print_event(event, "  ");
        }
        Decoded::Event { source, event } => {
            println!("{}", source.display());
            print_event(event, "  ");
        }
        Decoded::Submission { source, submission } => {
            println!("{}", source.display());
            println!("  Device id: {}", submission.device_id);
            if let Some(user_id) = &submission.user_id {
                println!("  User id: {}", user_id);
            }
            println!("  Events: {}", submission.events.len());
            for event in &submission.events {
                print_event(event, "    ");
            }
        }
    }
}

fn print_event(event: &Event, indent: &str) {
    println!("{indent}Event {} ({:?})", event.event_id, event.event_type);
    if let Some(path) = &event.path {
        println!("{indent}  Path: {}", path);
    }
    if let Some(view_id) = &event.view_id {
        println!("{indent}  View id: {}", view_id);
    }
    if let Some(age) = event.age_ms_long {
        println!("{indent}  Age: {} ms", age);
    }
}
