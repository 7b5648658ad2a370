//! Command implementations.

mod decode;
mod flush;
mod send;
mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::TelemetryConfig;

use crate::error::CliError;

pub use decode::run_decode;
pub use flush::run_flush;
pub use send::run_send;
pub use validate::run_validate;

/// Load and validate the configuration at `path`
fn load_config(path: &Path) -> Result<TelemetryConfig> {
    if !path.exists() {
        return Err(CliError::config_not_found(path).into());
    }
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}
