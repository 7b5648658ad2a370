//! # Ophan CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 事件发送与存量 flush
//! - 存储记录解码

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_decode, run_flush, run_send, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Ophan CLI starting");

    let result = match &cli.command {
        Commands::Send(args) => run_send(args).await,
        Commands::Flush(args) => run_flush(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Decode(args) => run_decode(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    let format = match cli.log_format {
        cli::LogFormat::Json => observability::LogFormat::Json,
        cli::LogFormat::Pretty => observability::LogFormat::Pretty,
        cli::LogFormat::Compact => observability::LogFormat::Compact,
    };
    observability::init_with_config(ObservabilityConfig::with_verbosity(
        format,
        cli.verbose,
        cli.quiet,
    ))
}
