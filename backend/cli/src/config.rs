use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use filepost_client::{BodyDiagnostics, TransportErrorPolicy, UploadOptions};
use filepost_core::DEFAULT_ENDPOINT;

/// filepost runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server origin, e.g. `http://127.0.0.1:8080`
    pub base_url: String,
    /// Upload path on the server
    pub endpoint: String,
    /// Directory for rolling NDJSON logs
    pub log_dir: Option<PathBuf>,
    /// Log level
    pub log_level: String,
    /// Read failure bodies before logging them
    pub await_body_diagnostics: bool,
    /// Return transport errors instead of logging them
    pub propagate_transport_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            log_dir: None,
            log_level: "info".to_string(),
            await_body_diagnostics: true,
            propagate_transport_errors: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Load configuration from a provided map (useful for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| vars.get(key).filter(|v| !v.is_empty()).cloned();

        Self {
            base_url: get("FILEPOST_BASE_URL").unwrap_or(defaults.base_url),
            endpoint: get("FILEPOST_ENDPOINT").unwrap_or(defaults.endpoint),
            log_dir: get("FILEPOST_LOG_DIR").map(PathBuf::from),
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
            await_body_diagnostics: get("FILEPOST_BODY_DIAGNOSTICS")
                .map(|v| !v.eq_ignore_ascii_case("unawaited"))
                .unwrap_or(defaults.await_body_diagnostics),
            propagate_transport_errors: get("FILEPOST_TRANSPORT_ERRORS")
                .map(|v| v.eq_ignore_ascii_case("propagate"))
                .unwrap_or(defaults.propagate_transport_errors),
        }
    }

    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions {
            body_diagnostics: if self.await_body_diagnostics {
                BodyDiagnostics::Awaited
            } else {
                BodyDiagnostics::Unawaited
            },
            transport_errors: if self.propagate_transport_errors {
                TransportErrorPolicy::Propagate
            } else {
                TransportErrorPolicy::Log
            },
        }
    }
}
