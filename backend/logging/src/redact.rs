//! Log redaction.
//!
//! Server error bodies are logged verbatim otherwise, and some servers echo
//! request headers or credentials back in them. Only credential shapes are
//! matched; plain numbers (request ids, sizes, timestamps) are left alone.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});
static COOKIE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)((?:set-)?cookie:\s*)[^\r\n]+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    COOKIE_RE
        .replace_all(&redacted, "${1}[REDACTED_COOKIE]")
        .into_owned()
}
