//! TelemetryConfig - Config Loader 输出
//!
//! 描述宿主注入的身份信息、上报端点、存储方式以及分发策略。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{App, Device, MembershipTier, SubscriptionType};

/// 生产环境采集端点
pub const PRODUCTION_ENDPOINT: &str = "https://ophan.theguardian.com/mob";

/// 调试回环端点
pub const LOOPBACK_ENDPOINT: &str = "https://ophan.theguardian.com/mob-loopback";

/// 完整的遥测配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// 应用信息
    #[serde(default)]
    pub app: App,

    /// 设备信息 (可选)
    #[serde(default)]
    pub device: Option<Device>,

    /// 用户与设备身份
    pub identity: IdentityConfig,

    /// 上报端点
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// 记录存储
    #[serde(default)]
    pub store: StoreConfig,

    /// 分发策略
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// 身份信息，随每个批次一起提交
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub device_id: String,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub krux_id: Option<String>,

    #[serde(default)]
    pub subscription: Option<SubscriptionType>,

    #[serde(default)]
    pub membership_tier: Option<MembershipTier>,
}

/// 端点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    #[default]
    Production,
    Loopback,
    Custom,
}

/// 端点配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default)]
    pub kind: EndpointKind,

    /// 仅 `custom` 使用
    #[serde(default)]
    pub url: Option<String>,

    /// 请求超时 (毫秒)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            kind: EndpointKind::default(),
            url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl EndpointConfig {
    /// 实际请求地址；`custom` 未配置 url 时为 None
    pub fn url(&self) -> Option<&str> {
        match self.kind {
            EndpointKind::Production => Some(PRODUCTION_ENDPOINT),
            EndpointKind::Loopback => Some(LOOPBACK_ENDPOINT),
            EndpointKind::Custom => self.url.as_deref(),
        }
    }
}

/// 存储类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Memory,
    File,
}

/// 存储配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,

    /// `file` 存储目录
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// 并发 flush 策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushMode {
    /// 同一时刻只允许一个 flush
    #[default]
    SingleFlight,
    /// 允许并发 flush，可能重复发送
    Concurrent,
}

/// 无法解码的记录如何处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptRecordPolicy {
    /// 记录告警后删除
    #[default]
    Remove,
    /// 保留在存储中
    Retain,
}

/// 分发配置
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub flush_mode: FlushMode,

    #[serde(default)]
    pub corrupt_records: CorruptRecordPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config: TelemetryConfig =
            serde_json::from_str(r#"{"identity":{"device_id":"d"}}"#).unwrap();
        assert_eq!(config.endpoint.url(), Some(PRODUCTION_ENDPOINT));
        assert_eq!(config.endpoint.timeout_ms, 10_000);
        assert_eq!(config.store.kind, StoreKind::Memory);
        assert_eq!(config.dispatch.flush_mode, FlushMode::SingleFlight);
        assert_eq!(config.dispatch.corrupt_records, CorruptRecordPolicy::Remove);
        assert!(config.device.is_none());
    }

    #[test]
    fn test_custom_endpoint_url() {
        let endpoint = EndpointConfig {
            kind: EndpointKind::Custom,
            url: None,
            timeout_ms: 1,
        };
        assert_eq!(endpoint.url(), None);

        let endpoint = EndpointConfig {
            url: Some("http://localhost:9000/mob".into()),
            ..endpoint
        };
        assert_eq!(endpoint.url(), Some("http://localhost:9000/mob"));
    }

    #[test]
    fn test_policy_names() {
        let dispatch: DispatchConfig =
            serde_json::from_str(r#"{"flush_mode":"concurrent","corrupt_records":"retain"}"#)
                .unwrap();
        assert_eq!(dispatch.flush_mode, FlushMode::Concurrent);
        assert_eq!(dispatch.corrupt_records, CorruptRecordPolicy::Retain);
    }
}
