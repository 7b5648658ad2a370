//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Generate `TelemetryConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("ophan.toml")).unwrap();
//! println!("Device: {}", config.identity.device_id);
//! ```

mod parser;
mod validator;

pub use contracts::TelemetryConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<TelemetryConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<TelemetryConfig, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize TelemetryConfig to TOML string
    pub fn to_toml(config: &TelemetryConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize TelemetryConfig to JSON string
    pub fn to_json(config: &TelemetryConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<TelemetryConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{EndpointKind, FlushMode, StoreKind, LOOPBACK_ENDPOINT};

    const MINIMAL_TOML: &str = r#"
[app]
version = "6.12"
family = "android"
edition = "uk"

[device]
name = "Pixel 8"
manufacturer = "Google"

[identity]
device_id = "d-123"
subscription = "free"
membership_tier = "supporter"

[endpoint]
kind = "loopback"
timeout_ms = 5000

[store]
kind = "file"
path = "./ophan-records"

[dispatch]
flush_mode = "concurrent"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.identity.device_id, "d-123");
        assert_eq!(config.endpoint.url(), Some(LOOPBACK_ENDPOINT));
        assert_eq!(config.store.kind, StoreKind::File);
        assert_eq!(config.dispatch.flush_mode, FlushMode::Concurrent);
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(config.app, config2.app);
        assert_eq!(config.device, config2.device);
        assert_eq!(config2.endpoint.kind, EndpointKind::Loopback);
    }

    #[test]
    fn test_round_trip_json() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config.identity.device_id, config2.identity.device_id);
        assert_eq!(config.identity.membership_tier, config2.identity.membership_tier);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[identity]
device_id = ""
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("identity.device_id"));
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ophan.json");
        std::fs::write(&path, r#"{"identity":{"device_id":"from-file"}}"#).unwrap();

        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config.identity.device_id, "from-file");

        let bad = dir.path().join("ophan.yaml");
        std::fs::write(&bad, "identity: {}").unwrap();
        let err = ConfigLoader::load_from_path(&bad).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }
}
