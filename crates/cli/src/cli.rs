//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Ophan CLI - Store-and-forward telemetry for native apps
#[derive(Parser, Debug)]
#[command(
    name = "ophan-cli",
    author,
    version,
    about = "Ophan native-app telemetry dispatcher",
    long_about = "Encodes telemetry events with the Thrift compact protocol, persists them \n\
                  in a record store and forwards them in batches to the Ophan collector.\n\n\
                  Records that fail to send stay stored until a later flush succeeds."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "OPHAN_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "OPHAN_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch one or more events and flush them to the collector
    Send(SendArgs),

    /// Flush whatever the configured store holds
    Flush(FlushArgs),

    /// Validate configuration file without sending anything
    Validate(ValidateArgs),

    /// Decode a stored record or an encoded submission
    Decode(DecodeArgs),
}

/// Arguments for the `send` command
#[derive(Parser, Debug, Clone)]
pub struct SendArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "ophan.toml", env = "OPHAN_CONFIG")]
    pub config: PathBuf,

    /// Explicit event ids; generated when omitted
    #[arg(long = "event-id", value_name = "ID")]
    pub event_ids: Vec<String>,

    /// Number of events to generate when no ids are given
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Page path stamped onto every event
    #[arg(long)]
    pub path: Option<String>,

    /// Page view id stamped onto every event
    #[arg(long)]
    pub view_id: Option<String>,

    /// Log submissions instead of posting them
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "OPHAN_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `flush` command
#[derive(Parser, Debug, Clone)]
pub struct FlushArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "ophan.toml", env = "OPHAN_CONFIG")]
    pub config: PathBuf,

    /// Log submissions instead of posting them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "ophan.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `decode` command
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// File to decode, or a file-store directory when `--kind record`
    pub input: PathBuf,

    /// What the input holds
    #[arg(short, long, value_enum, default_value = "record")]
    pub kind: PayloadKind,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Encoded payload shapes understood by `decode`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    /// Timestamp-prefixed event as written by the record store
    Record,
    /// Bare compact-encoded event
    Event,
    /// Compact-encoded NativeAppSubmission body
    Submission,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
