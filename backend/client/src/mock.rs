use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use filepost_core::{FormPayload, Transport, TransportResponse, UploadError};

/// A request as seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub payload: FormPayload,
}

/// A transport that returns canned responses and records every request.
pub struct MockTransport {
    status: u16,
    body: String,
    network_error: Option<String>,
    body_error: Option<String>,
    latency: Option<Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
    body_reads: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: String::new(),
            network_error: None,
            body_error: None,
            latency: None,
            requests: Mutex::new(Vec::new()),
            body_reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_response(mut self, status: u16, body: impl Into<String>) -> Self {
        self.status = status;
        self.body = body.into();
        self
    }

    /// Fail every request as if the server were unreachable.
    pub fn with_network_error(mut self, message: impl Into<String>) -> Self {
        self.network_error = Some(message.into());
        self
    }

    /// Fail every body read after the status has arrived.
    pub fn with_body_error(mut self, message: impl Into<String>) -> Self {
        self.body_error = Some(message.into());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// How many response bodies have been read.
    pub fn body_reads(&self) -> usize {
        self.body_reads.load(Ordering::SeqCst)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn post(
        &self,
        endpoint: &str,
        payload: &FormPayload,
    ) -> Result<Box<dyn TransportResponse>, UploadError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedRequest {
                endpoint: endpoint.to_string(),
                payload: payload.clone(),
            });

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(message) = &self.network_error {
            return Err(UploadError::Transport(message.clone()));
        }

        Ok(Box::new(MockResponse {
            status: self.status,
            body: match &self.body_error {
                Some(message) => Err(message.clone()),
                None => Ok(self.body.clone()),
            },
            reads: Arc::clone(&self.body_reads),
        }))
    }
}

struct MockResponse {
    status: u16,
    body: Result<String, String>,
    reads: Arc<AtomicUsize>,
}

#[async_trait]
impl TransportResponse for MockResponse {
    fn status(&self) -> u16 {
        self.status
    }

    async fn text(self: Box<Self>) -> Result<String, UploadError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.body.map_err(UploadError::BodyRead)
    }
}
