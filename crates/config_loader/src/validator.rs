//! 配置校验模块
//!
//! 校验规则：
//! - device_id 非空
//! - custom 端点必须提供 http(s) url
//! - timeout_ms > 0
//! - file 存储必须提供非空 path

use contracts::{ContractError, EndpointKind, StoreKind, TelemetryConfig};

/// 校验 TelemetryConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &TelemetryConfig) -> Result<(), ContractError> {
    validate_identity(config)?;
    validate_endpoint(config)?;
    validate_store(config)?;
    Ok(())
}

/// 校验身份信息
fn validate_identity(config: &TelemetryConfig) -> Result<(), ContractError> {
    if config.identity.device_id.trim().is_empty() {
        return Err(ContractError::config_validation(
            "identity.device_id",
            "device_id cannot be empty",
        ));
    }
    Ok(())
}

/// 校验上报端点
fn validate_endpoint(config: &TelemetryConfig) -> Result<(), ContractError> {
    let endpoint = &config.endpoint;

    if endpoint.timeout_ms == 0 {
        return Err(ContractError::config_validation(
            "endpoint.timeout_ms",
            "timeout_ms must be > 0",
        ));
    }

    if endpoint.kind == EndpointKind::Custom {
        let url = endpoint.url.as_deref().unwrap_or_default();
        if url.is_empty() {
            return Err(ContractError::config_validation(
                "endpoint.url",
                "custom endpoint requires a url",
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ContractError::config_validation(
                "endpoint.url",
                format!("url must start with http:// or https://, got '{url}'"),
            ));
        }
    }

    Ok(())
}

/// 校验存储配置
fn validate_store(config: &TelemetryConfig) -> Result<(), ContractError> {
    if config.store.kind != StoreKind::File {
        return Ok(());
    }
    match &config.store.path {
        Some(path) if !path.as_os_str().is_empty() => Ok(()),
        _ => Err(ContractError::config_validation(
            "store.path",
            "file store requires a directory path",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{App, DispatchConfig, EndpointConfig, IdentityConfig, StoreConfig};
    use std::path::PathBuf;

    fn minimal_config() -> TelemetryConfig {
        TelemetryConfig {
            app: App::default(),
            device: None,
            identity: IdentityConfig {
                device_id: "d-1".into(),
                user_id: None,
                krux_id: None,
                subscription: None,
                membership_tier: None,
            },
            endpoint: EndpointConfig::default(),
            store: StoreConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }

    fn field_of(err: ContractError) -> String {
        match err {
            ContractError::ConfigValidation { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_config()).is_ok());
    }

    #[test]
    fn test_blank_device_id() {
        let mut config = minimal_config();
        config.identity.device_id = "  ".into();
        assert_eq!(field_of(validate(&config).unwrap_err()), "identity.device_id");
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = minimal_config();
        config.endpoint.timeout_ms = 0;
        assert_eq!(field_of(validate(&config).unwrap_err()), "endpoint.timeout_ms");
    }

    #[test]
    fn test_custom_endpoint_needs_url() {
        let mut config = minimal_config();
        config.endpoint.kind = EndpointKind::Custom;
        assert_eq!(field_of(validate(&config).unwrap_err()), "endpoint.url");

        config.endpoint.url = Some("ftp://collector".into());
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("http://"));

        config.endpoint.url = Some("https://collector.example/mob".into());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_url_ignored_for_builtin_endpoints() {
        let mut config = minimal_config();
        config.endpoint.url = Some("not a url".into());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_file_store_needs_path() {
        let mut config = minimal_config();
        config.store.kind = StoreKind::File;
        assert_eq!(field_of(validate(&config).unwrap_err()), "store.path");

        config.store.path = Some(PathBuf::new());
        assert_eq!(field_of(validate(&config).unwrap_err()), "store.path");

        config.store.path = Some(PathBuf::from("./records"));
        assert!(validate(&config).is_ok());
    }
}
