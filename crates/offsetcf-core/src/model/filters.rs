// ── Opt-in query key ──
//
// The (store, month) pair that both the summary and the export are
// derived from. Built fresh from UI/CLI state for every query.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::month::Month;
use crate::error::CoreError;

/// Sentinel store value meaning "every store". Summaries never accept it.
pub const ALL_STORES: &str = "all";

/// Immutable filter value for the monthly summary and its export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptInFilters {
    store_id: Option<String>,
    month: Option<Month>,
}

impl OptInFilters {
    pub fn new(store_id: impl Into<String>, month: Month) -> Self {
        Self {
            store_id: Some(store_id.into()),
            month: Some(month),
        }
    }

    /// Filters for a store with no month; the backend picks the month.
    pub fn for_store(store_id: impl Into<String>) -> Self {
        Self {
            store_id: Some(store_id.into()),
            month: None,
        }
    }

    /// Copy of these filters with a different store.
    pub fn with_store(&self, store_id: Option<String>) -> Self {
        Self {
            store_id,
            month: self.month,
        }
    }

    /// Copy of these filters with a different month.
    pub fn with_month(&self, month: Option<Month>) -> Self {
        Self {
            store_id: self.store_id.clone(),
            month,
        }
    }

    pub fn store_id(&self) -> Option<&str> {
        self.store_id.as_deref()
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    /// The single store this query is scoped to.
    ///
    /// Fails with [`CoreError::MissingStoreId`] when the store is absent,
    /// blank, or the [`ALL_STORES`] sentinel.
    pub fn scoped_store(&self) -> Result<&str, CoreError> {
        match self.store_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() && !id.eq_ignore_ascii_case(ALL_STORES) => Ok(id),
            _ => Err(CoreError::MissingStoreId),
        }
    }

    /// `month` query parameter value, if any.
    pub fn month_param(&self) -> Option<String> {
        self.month.map(|m| m.to_string())
    }

    /// Download filename: `opt-ins-{month}.csv`, or `opt-ins-all-time.csv`.
    pub fn export_filename(&self) -> String {
        match self.month {
            Some(month) => format!("opt-ins-{month}.csv"),
            None => "opt-ins-all-time.csv".into(),
        }
    }
}

impl fmt::Display for OptInFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store_id.as_deref().unwrap_or(ALL_STORES);
        match self.month {
            Some(month) => write!(f, "{store} @ {month}"),
            None => write!(f, "{store} @ latest"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn jan() -> Month {
        "2024-01".parse().unwrap()
    }

    #[test]
    fn scoped_store_rejects_missing_blank_and_all() {
        assert!(matches!(
            OptInFilters::default().scoped_store(),
            Err(CoreError::MissingStoreId)
        ));
        for bad in ["", "   ", "all", "ALL"] {
            assert!(
                OptInFilters::new(bad, jan()).scoped_store().is_err(),
                "accepted {bad:?}"
            );
        }
        assert_eq!(
            OptInFilters::new("ecocart-widget.myshopify.com", jan())
                .scoped_store()
                .unwrap(),
            "ecocart-widget.myshopify.com"
        );
    }

    #[test]
    fn export_filename_follows_month() {
        assert_eq!(
            OptInFilters::new("s", jan()).export_filename(),
            "opt-ins-2024-01.csv"
        );
        assert_eq!(
            OptInFilters::for_store("s").export_filename(),
            "opt-ins-all-time.csv"
        );
    }

    #[test]
    fn with_month_keeps_store() {
        let filters = OptInFilters::new("s", jan());
        let feb = filters.with_month(jan().next());
        assert_eq!(feb.store_id(), Some("s"));
        assert_eq!(feb.month_param().as_deref(), Some("2024-02"));
        assert_ne!(filters, feb);
    }
}
