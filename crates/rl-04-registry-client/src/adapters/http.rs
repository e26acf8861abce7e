//! HTTP transport over reqwest.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ClientConfig;
use crate::domain::{ClientError, TransportError};
use crate::ports::Transport;

/// Content type of request envelopes.
pub const XML_CONTENT_TYPE: &str = "text/xml; charset=iso-8859-1";

/// POSTs envelopes to the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport for `config`'s endpoint and request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
        })
    }

    /// Target URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn network(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Network(format!("timed out: {e}"))
    } else if e.is_connect() {
        TransportError::Network(format!("cannot connect: {e}"))
    } else {
        TransportError::Network(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: Vec<u8>, cancel: &CancellationToken) -> Result<Vec<u8>, TransportError> {
        debug!("[rl-04] POST {} ({} bytes)", self.endpoint, body.len());

        let request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body)
            .send();

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            response = request => response.map_err(network)?,
        };

        let status = response.status();
        let bytes = tokio::select! {
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            bytes = response.bytes() => bytes.map_err(network)?,
        };

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        debug!("[rl-04] HTTP {} ({} bytes)", status.as_u16(), bytes.len());
        Ok(bytes.to_vec())
    }
}
