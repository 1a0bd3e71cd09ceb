//! Domain layer between `offsetcf-api` and the console front ends.
//!
//! - **[`Console`]** is the facade: validated merchant and store
//!   operations, and the [`SummarySource`] for opt-in reporting.
//!
//! - **[`ReportingView`]** holds the opt-in filters, fetches the monthly
//!   summary, and publishes [`ReportState`] on a `watch` channel. Only the
//!   newest filter key may commit; older fetches are cancelled. Exports
//!   are taken from the loaded report's key, never from unapplied edits.
//!
//! - **Domain model** ([`model`]) is [`Month`], [`OptInFilters`], and
//!   [`MonthlySummary`], which is built from the wire response only after
//!   its daily rows and totals check out.
//!
//! - **[`validation`]** checks merchant and store input before anything
//!   is sent.

pub mod config;
pub mod console;
pub mod error;
pub mod export;
pub mod model;
pub mod reporting;
pub mod validation;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ConsoleConfig;
pub use offsetcf_api::DEFAULT_API_URL;
pub use console::Console;
pub use error::CoreError;
pub use export::ExportFile;
pub use reporting::{ApplyOutcome, Report, ReportState, ReportingView, SummarySource};
pub use validation::{
    FieldError, MerchantForm, MerchantPatch, StoreForm, StorePatch, ValidationErrors,
};

pub use model::{
    ALL_STORES, DEFAULT_CURRENCY, DailyOptIns, Merchant, Month, MonthlySummary, OFFSET_TOLERANCE,
    OptInFilters, Store, Totals, WidgetConfig, WidgetPosition, WidgetTheme,
};
