use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the entire health-report-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Source / Network ────────────────────────────────────────────
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Source returned HTTP {status}: {message}")]
    SourceProtocol { status: u16, message: String },

    #[error("Malformed source response: {0}")]
    SourceFormat(String),

    // ── Derivation ──────────────────────────────────────────────────
    #[error("Missing required input: {0}")]
    MissingRequiredInput(String),

    // ── Startup ─────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Machine-readable category of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SourceUnavailable,
    SourceProtocol,
    SourceFormat,
    MissingRequiredInput,
    Configuration,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::SourceUnavailable => "source_unavailable",
            ErrorKind::SourceProtocol => "source_protocol",
            ErrorKind::SourceFormat => "source_format",
            ErrorKind::MissingRequiredInput => "missing_required_input",
            ErrorKind::Configuration => "configuration",
        };
        f.write_str(s)
    }
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::SourceUnavailable(_) => ErrorKind::SourceUnavailable,
            CoreError::SourceProtocol { .. } => ErrorKind::SourceProtocol,
            CoreError::SourceFormat(_) => ErrorKind::SourceFormat,
            CoreError::MissingRequiredInput(_) => ErrorKind::MissingRequiredInput,
            CoreError::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

/// The single structured result a caller receives when a report fails as a whole.
/// No partial report accompanies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&CoreError> for ErrorReport {
    fn from(e: &CoreError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

/// Strip query parameters from anything that looks like a URL so filters
/// and credentials passed in the query never end up in logs.
pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => {
            let tail = &msg[idx..];
            // keep whatever follows the URL (reqwest appends ")" or ": reason")
            let rest = tail
                .find(|c: char| c == ')' || c.is_whitespace())
                .map(|end| &tail[end..])
                .unwrap_or("");
            format!("{}?<query redacted>{rest}", &msg[..idx])
        }
        None => msg.to_string(),
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        let sanitized = redact_query(&e.to_string());
        if e.is_decode() {
            CoreError::SourceFormat(sanitized)
        } else if let Some(status) = e.status() {
            CoreError::SourceProtocol {
                status: status.as_u16(),
                message: sanitized,
            }
        } else {
            CoreError::SourceUnavailable(sanitized)
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::SourceFormat(e.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(e: config::ConfigError) -> Self {
        CoreError::Configuration(e.to_string())
    }
}
