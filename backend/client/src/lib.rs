//! Multipart upload client.
//!
//! [`upload_files`] packages a [`FileSelection`](filepost_core::FileSelection)
//! under the repeated `file` field and POSTs it through a
//! [`Transport`](filepost_core::Transport): [`HttpTransport`] for real
//! servers, [`MockTransport`] for tests.

pub mod action;
pub mod http;
pub mod mock;

#[cfg(test)]
mod test_support;

pub use action::{
    upload_files, BodyDiagnostics, TransportErrorPolicy, UploadAction, UploadOptions,
    PENDING_BODY_PLACEHOLDER,
};
pub use http::HttpTransport;
pub use mock::{MockTransport, RecordedRequest};
