//! HttpTransport - POSTs submissions to the collector

use bytes::Bytes;
use contracts::{ContractError, SubmissionTransport};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, instrument};

/// Transport that sends each submission as one HTTP POST
pub struct HttpTransport {
    name: String,
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Create a transport for `url`, with an optional per-request timeout
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ContractError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ContractError::transport(format!("http client: {e}")))?;

        Ok(Self {
            name: name.into(),
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SubmissionTransport for HttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "http_transport_post",
        skip(self, body),
        fields(transport = %self.name, url = %self.url, bytes = body.len())
    )]
    async fn post(&self, body: Bytes, content_type: &str) -> Result<(), ContractError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| ContractError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContractError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        debug!(transport = %self.name, status = status.as_u16(), "Submission acknowledged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accepts one request, answers with `status`, returns the raw request
    async fn one_shot_server(status: &'static str) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/mob", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                request.extend_from_slice(&chunk[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            let response = format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\n\r\n");
            socket.write_all(response.as_bytes()).await.unwrap();
            request
        });
        (url, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= end + 4 + length
    }

    #[tokio::test]
    async fn test_post_sends_body_and_content_type() {
        let (url, server) = one_shot_server("204 No Content").await;
        let transport = HttpTransport::new("http", url, Some(Duration::from_secs(5))).unwrap();

        transport
            .post(Bytes::from_static(b"\x82payload"), codec::COMPACT_CONTENT_TYPE)
            .await
            .unwrap();

        let request = server.await.unwrap();
        let text = String::from_utf8_lossy(&request).to_ascii_lowercase();
        assert!(text.starts_with("post /mob "));
        assert!(text.contains("content-type: application/vnd.apache.thrift.compact"));
        assert!(request.ends_with(b"\x82payload"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (url, server) = one_shot_server("503 Service Unavailable").await;
        let transport = HttpTransport::new("http", url, None).unwrap();

        let err = transport
            .post(Bytes::from_static(b"x"), codec::COMPACT_CONTENT_TYPE)
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::HttpStatus { status: 503, .. }));
        assert!(err.is_transport());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_collector() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/mob", listener.local_addr().unwrap());
        drop(listener);

        let transport = HttpTransport::new("http", url, Some(Duration::from_secs(2))).unwrap();
        let err = transport
            .post(Bytes::from_static(b"x"), codec::COMPACT_CONTENT_TYPE)
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Transport { .. }));
    }
}
