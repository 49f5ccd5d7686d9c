//! The upload action: selection in, one multipart POST out, outcome back.

use std::sync::Arc;

use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use filepost_core::{
    FileSelection, FormPayload, Transport, TransportResponse, UploadError, UploadOutcome,
    DEFAULT_ENDPOINT,
};
use filepost_logging::redact_sensitive_data;

/// Diagnostic recorded when the failure body is never read.
pub const PENDING_BODY_PLACEHOLDER: &str = "[pending response body]";

/// How the body of a failed response is turned into a diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyDiagnostics {
    /// Await the body read, then log its text.
    #[default]
    Awaited,
    /// Log [`PENDING_BODY_PLACEHOLDER`] without reading the body.
    Unawaited,
}

/// What to do when the request never produces a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportErrorPolicy {
    /// Log the failure and return [`UploadOutcome::TransportFailed`].
    #[default]
    Log,
    /// Return the error to the caller untouched.
    Propagate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOptions {
    pub body_diagnostics: BodyDiagnostics,
    pub transport_errors: TransportErrorPolicy,
}

/// An upload action bound to a transport and endpoint.
///
/// Holds no per-call state; one instance can serve any number of
/// overlapping invocations.
#[derive(Clone)]
pub struct UploadAction {
    transport: Arc<dyn Transport>,
    endpoint: String,
    options: UploadOptions,
}

impl UploadAction {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            options: UploadOptions::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn upload_files(
        &self,
        selection: &FileSelection,
    ) -> Result<UploadOutcome, UploadError> {
        upload_files(self.transport.as_ref(), &self.endpoint, selection, self.options).await
    }
}

/// Upload every file in `selection` to `endpoint` in a single POST.
///
/// Server-reported failures are returned as [`UploadOutcome::Failure`]. An
/// `Err` is only returned for transport failures under
/// [`TransportErrorPolicy::Propagate`].
pub async fn upload_files(
    transport: &dyn Transport,
    endpoint: &str,
    selection: &FileSelection,
    options: UploadOptions,
) -> Result<UploadOutcome, UploadError> {
    let upload_id = Uuid::new_v4();
    let span = info_span!("upload", %upload_id, transport = transport.name(), endpoint);

    async move {
        info!(
            files = selection.len(),
            bytes = selection.total_bytes(),
            "Uploading files..."
        );

        let payload = FormPayload::from_selection(selection);

        let response = match transport.post(endpoint, &payload).await {
            Ok(response) => response,
            Err(e) => return handle_transport_error(e, options.transport_errors),
        };

        let status = response.status();
        if response.is_success() {
            info!(status, "Files uploaded successfully!");
            return Ok(UploadOutcome::Success { status });
        }

        let diagnostic = read_diagnostic(response, options.body_diagnostics).await;
        error!(
            status,
            diagnostic = %redact_sensitive_data(&diagnostic),
            "Failed to upload files!"
        );
        Ok(UploadOutcome::Failure { status, diagnostic })
    }
    .instrument(span)
    .await
}

async fn read_diagnostic(response: Box<dyn TransportResponse>, mode: BodyDiagnostics) -> String {
    match mode {
        BodyDiagnostics::Awaited => match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Could not read failure response body");
                String::new()
            }
        },
        BodyDiagnostics::Unawaited => PENDING_BODY_PLACEHOLDER.to_string(),
    }
}

fn handle_transport_error(
    err: UploadError,
    policy: TransportErrorPolicy,
) -> Result<UploadOutcome, UploadError> {
    match policy {
        TransportErrorPolicy::Log => {
            error!(error = %err, "Failed to upload files!");
            Ok(UploadOutcome::TransportFailed {
                error: err.to_string(),
            })
        }
        TransportErrorPolicy::Propagate => Err(err),
    }
}
