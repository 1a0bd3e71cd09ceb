//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use offsetcf_config::ConfigError;
use offsetcf_core::CoreError;

/// Process exit codes. Success is 0.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the OffsetCF API at {url}")]
    #[diagnostic(
        code(offsetcf::connection_failed),
        help(
            "Check your network connection and the API URL.\n\
             Override it with --api-url or OFFSETCF_API_URL."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(offsetcf::timeout),
        help("Increase the timeout with --timeout or `offsetcf config set timeout <secs>`.")
    )]
    Timeout { seconds: u64 },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(offsetcf::not_found),
        help("Run: offsetcf {list_command}")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    #[diagnostic(code(offsetcf::api_error))]
    ApiError { status: Option<u16>, message: String },

    #[error("The API returned an inconsistent summary: {reason}")]
    #[diagnostic(
        code(offsetcf::invalid_summary),
        help("The daily rows and totals disagree. Try again, or report it to OffsetCF support.")
    )]
    InvalidSummary { reason: String },

    // ── Opt-in reports ───────────────────────────────────────────────
    #[error("Store ID is required")]
    #[diagnostic(
        code(offsetcf::missing_store),
        help(
            "Summaries are per store. Pass --store <id>, or save one with:\n\
             offsetcf config set store_id <id>"
        )
    )]
    MissingStore,

    #[error("No report is loaded")]
    #[diagnostic(code(offsetcf::no_report))]
    NoReport,

    #[error("Export failed: {message}")]
    #[diagnostic(code(offsetcf::export))]
    Export { message: String },

    #[error("Export {filename} does not match the summary")]
    #[diagnostic(
        code(offsetcf::export_mismatch),
        help("Summary: {summary}\nExport:  {export}")
    )]
    ExportMismatch {
        filename: String,
        summary: String,
        export: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(offsetcf::validation))]
    Validation { field: String, reason: String },

    #[error("No {what} given")]
    #[diagnostic(code(offsetcf::missing_argument), help("{hint}"))]
    MissingArgument { what: String, hint: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(offsetcf::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: offsetcf config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(offsetcf::config))]
    Config(#[from] ConfigError),

    #[error("Configuration error: {message}")]
    #[diagnostic(code(offsetcf::config))]
    InvalidConfig { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(offsetcf::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::MissingArgument { .. }
            | Self::MissingStore
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::from(&err)
    }
}

/// The reporting view keeps its error behind an `Arc`, so mapping works
/// from a reference.
impl From<&CoreError> for CliError {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::MissingStoreId => CliError::MissingStore,

            CoreError::InvalidMonth { value } => CliError::Validation {
                field: "month".into(),
                reason: format!("'{value}' is not a YYYY-MM month"),
            },

            CoreError::Validation(errors) => CliError::Validation {
                field: errors
                    .fields()
                    .iter()
                    .map(|e| e.field)
                    .collect::<Vec<_>>()
                    .join(", "),
                reason: errors
                    .fields()
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            },

            CoreError::NoReportLoaded => CliError::NoReport,

            CoreError::InvalidSummary { reason } => CliError::InvalidSummary {
                reason: reason.clone(),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: match entity_type.as_str() {
                    "store" => "stores list".into(),
                    "merchant" => "config show".into(),
                    _ => "opt-ins summary --store <id>".into(),
                },
                resource_type: entity_type.clone(),
                identifier: identifier.clone(),
            },

            CoreError::Export { message } => CliError::Export {
                message: message.clone(),
            },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url: url.clone(),
                source: reason.clone().into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: *timeout_secs,
            },

            CoreError::Fetch { message, status } => CliError::ApiError {
                status: *status,
                message: message.clone(),
            },

            CoreError::Config { message } => CliError::InvalidConfig {
                message: message.clone(),
            },
        }
    }
}
