//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{EndpointKind, FlushMode, StoreKind, TelemetryConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    app_version: Option<String>,
    device_id: String,
    endpoint: Option<String>,
    store: StoreKind,
    flush_mode: FlushMode,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    app_version: config.app.version.clone(),
                    device_id: config.identity.device_id.clone(),
                    endpoint: config.endpoint.url().map(str::to_string),
                    store: config.store.kind,
                    flush_mode: config.dispatch.flush_mode,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &TelemetryConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.store.kind == StoreKind::Memory {
        warnings.push("store.kind is memory - undelivered events are lost on exit".to_string());
    }

    if config.endpoint.kind == EndpointKind::Loopback {
        warnings.push("endpoint.kind is loopback - events will not reach production".to_string());
    }

    if config.dispatch.flush_mode == FlushMode::Concurrent {
        warnings.push(
            "dispatch.flush_mode is concurrent - overlapping flushes may send duplicates"
                .to_string(),
        );
    }

    if config.app.version.is_none() {
        warnings.push("app.version is not set".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Device: {}", summary.device_id);
            println!(
                "  App version: {}",
                summary.app_version.as_deref().unwrap_or("-")
            );
            println!("  Endpoint: {}", summary.endpoint.as_deref().unwrap_or("-"));
            println!("  Store: {:?}", summary.store);
            println!("  Flush mode: {:?}", summary.flush_mode);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
