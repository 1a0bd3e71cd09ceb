// ── Domain model ──
//
// Merchant and store records are the API wire types, re-exported as-is;
// the opt-in reporting types carry their own invariants.

pub mod filters;
pub mod month;
pub mod summary;

pub use filters::{ALL_STORES, OptInFilters};
pub use month::Month;
pub use summary::{DEFAULT_CURRENCY, DailyOptIns, MonthlySummary, OFFSET_TOLERANCE, Totals};

pub use offsetcf_api::{Merchant, Store, WidgetConfig, WidgetPosition, WidgetTheme};
