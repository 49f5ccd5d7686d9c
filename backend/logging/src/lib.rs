//! Structured logging for filepost.
//!
//! Console output, optional rolling NDJSON files, and redaction of server
//! diagnostics before they reach either.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
