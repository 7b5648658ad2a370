//! Transport implementations
//!
//! Contains HttpTransport and LogTransport.

mod http;
mod log;

pub use self::http::HttpTransport;
pub use self::log::LogTransport;

use bytes::Bytes;
use contracts::{ContractError, EndpointConfig, SubmissionTransport};
use std::time::Duration;

use crate::error::DispatcherError;

/// Whichever transport the configuration selected
pub enum ConfiguredTransport {
    Http(HttpTransport),
    Log(LogTransport),
}

impl ConfiguredTransport {
    /// Build an HTTP transport for `config`, or a log transport when `dry_run`
    pub fn from_config(config: &EndpointConfig, dry_run: bool) -> Result<Self, DispatcherError> {
        if dry_run {
            return Ok(Self::Log(LogTransport::new("dry_run")));
        }

        let url = config.url().ok_or_else(|| {
            DispatcherError::setup("http transport", "custom endpoint without 'url'")
        })?;
        let timeout = (config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms));
        let transport = HttpTransport::new("http", url, timeout)?;
        Ok(Self::Http(transport))
    }
}

impl SubmissionTransport for ConfiguredTransport {
    fn name(&self) -> &str {
        match self {
            Self::Http(transport) => transport.name(),
            Self::Log(transport) => transport.name(),
        }
    }

    async fn post(&self, body: Bytes, content_type: &str) -> Result<(), ContractError> {
        match self {
            Self::Http(transport) => transport.post(body, content_type).await,
            Self::Log(transport) => transport.post(body, content_type).await,
        }
    }
}
