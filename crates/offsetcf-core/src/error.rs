// ── Core error types ──
//
// User-facing errors from offsetcf-core. Consumers never see raw HTTP
// plumbing; the `From<offsetcf_api::Error>` impl translates transport
// failures into domain-appropriate variants.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Preconditions ────────────────────────────────────────────────
    /// Summary and export are always scoped to exactly one store.
    #[error("Store ID is required")]
    MissingStoreId,

    #[error("Invalid month '{value}': expected YYYY-MM")]
    InvalidMonth { value: String },

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("No report is loaded; apply filters before exporting")]
    NoReportLoaded,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Monthly summary failed validation: {reason}")]
    InvalidSummary { reason: String },

    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Export failed: {message}")]
    Export { message: String },

    // ── Transport errors (wrapped, not exposed raw) ──────────────────
    #[error("Cannot reach API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Failed to fetch data: {message}")]
    Fetch {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for failures raised before any network call.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingStoreId
                | Self::InvalidMonth { .. }
                | Self::Validation(_)
                | Self::NoReportLoaded
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<offsetcf_api::Error> for CoreError {
    fn from(err: offsetcf_api::Error) -> Self {
        match err {
            offsetcf_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Fetch {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            offsetcf_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            offsetcf_api::Error::InvalidBaseUrl { url } => CoreError::Config {
                message: format!("API URL cannot be used as a base: {url}"),
            },
            offsetcf_api::Error::ClientBuild(message) => CoreError::Config { message },
            offsetcf_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            offsetcf_api::Error::Api { status, message } => CoreError::Fetch {
                message,
                status: Some(status),
            },
            offsetcf_api::Error::Deserialization { message, body: _ } => CoreError::Fetch {
                message: format!("unexpected response body: {message}"),
                status: None,
            },
        }
    }
}
