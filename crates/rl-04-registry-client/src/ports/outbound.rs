//! # Outbound Ports
//!
//! The HTTP round trip to the registry service.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::domain::TransportError;

/// One request/response exchange with the service.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` and return the response body.
    ///
    /// Non-success statuses fail with `TransportError::Status`; cancelling
    /// `cancel` aborts the call with `TransportError::Cancelled`.
    async fn send(&self, body: Vec<u8>, cancel: &CancellationToken) -> Result<Vec<u8>, TransportError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

#[derive(Debug, Clone)]
enum MockReply {
    Body(Vec<u8>),
    Error(TransportError),
}

/// Scripted transport.
///
/// Replies are consumed in order; once the script is exhausted the
/// `fallback` body is returned for every further call, if set.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<MockReply>>,
    /// Returned when the script is empty.
    pub fallback: Option<Vec<u8>>,
    /// Delay before each reply.
    pub latency: Option<Duration>,
    requests: Mutex<Vec<Vec<u8>>>,
}

impl MockTransport {
    /// Transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a body reply.
    pub fn reply(self, body: impl Into<Vec<u8>>) -> Self {
        self.push(MockReply::Body(body.into()));
        self
    }

    /// Append an error reply.
    pub fn fail(self, error: TransportError) -> Self {
        self.push(MockReply::Error(error));
        self
    }

    /// Answer with `body` once the script is exhausted.
    pub fn then_always(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.fallback = Some(body.into());
        self
    }

    /// Delay every reply by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn push(&self, reply: MockReply) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
    }

    /// Request bodies received so far.
    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn next_reply(&self) -> MockReply {
        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match (scripted, &self.fallback) {
            (Some(reply), _) => reply,
            (None, Some(body)) => MockReply::Body(body.clone()),
            (None, None) => MockReply::Error(TransportError::Network("no scripted reply".to_string())),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, body: Vec<u8>, cancel: &CancellationToken) -> Result<Vec<u8>, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(body);
        }

        if let Some(latency) = self.latency {
            tokio::select! {
                _ = cancel.cancelled() => return Err(TransportError::Cancelled),
                _ = tokio::time::sleep(latency) => {}
            }
        } else if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        match self.next_reply() {
            MockReply::Body(body) => Ok(body),
            MockReply::Error(e) => Err(e),
        }
    }
}
