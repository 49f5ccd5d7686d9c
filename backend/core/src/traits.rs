use async_trait::async_trait;

use crate::error::UploadError;
use crate::types::{FileHandle, FormPayload};

/// Source of the files a user currently has selected.
pub trait FileInput: Send + Sync {
    /// Currently selected files, in selection order. Empty when nothing is selected.
    fn selected_files(&self) -> Vec<FileHandle>;
}

/// Performs the multipart POST for an upload.
///
/// Implementations must not retry and must not impose their own timeout.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name used in logs (e.g., "http", "mock").
    fn name(&self) -> &str;

    /// Send `payload` to `endpoint`. `Err` means no response was received.
    async fn post(
        &self,
        endpoint: &str,
        payload: &FormPayload,
    ) -> Result<Box<dyn TransportResponse>, UploadError>;
}

/// A response whose body has not been read yet.
#[async_trait]
pub trait TransportResponse: Send {
    fn status(&self) -> u16;

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Read the body as text. Suspends until the body has arrived.
    async fn text(self: Box<Self>) -> Result<String, UploadError>;
}
