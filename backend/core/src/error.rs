use thiserror::Error;

/// Top-level error type for an upload invocation.
///
/// Server-reported failures are not errors; they come back as
/// [`UploadOutcome::Failure`](crate::UploadOutcome::Failure).
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("failed to read response body: {0}")]
    BodyRead(String),

    #[error("invalid part for {file_name}: {message}")]
    InvalidPart { file_name: String, message: String },
}
