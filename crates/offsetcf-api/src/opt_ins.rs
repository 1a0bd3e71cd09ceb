// Opt-in summary endpoints
//
// Both endpoints are scoped to exactly one store and share the same
// query key: `{storeId}` in the path, optional `month=YYYY-MM`.
// Callers are expected to have rejected missing/"all" store ids already.

use bytes::Bytes;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::MonthlySummaryResponse;

impl ApiClient {
    /// Fetch the daily opt-in breakdown for one store and month.
    ///
    /// `GET /v1/merchant/{storeId}/monthly-summary?month=YYYY-MM`
    ///
    /// The `month` parameter is omitted when `None`, leaving the choice of
    /// month to the backend.
    pub async fn monthly_summary(
        &self,
        store_id: &str,
        month: Option<&str>,
    ) -> Result<MonthlySummaryResponse, Error> {
        let url = self.url(&["v1", "merchant", store_id, "monthly-summary"])?;
        debug!(store_id, ?month, "fetching monthly summary");
        self.get(url, &month_params(month)).await
    }

    /// Download the CSV export for one store and month.
    ///
    /// `GET /v1/merchant/{storeId}/monthly-summary/export?month=YYYY-MM`
    pub async fn export_monthly_summary(
        &self,
        store_id: &str,
        month: Option<&str>,
    ) -> Result<Bytes, Error> {
        let url = self.url(&["v1", "merchant", store_id, "monthly-summary", "export"])?;
        debug!(store_id, ?month, "exporting monthly summary");
        self.get_bytes(url, &month_params(month)).await
    }
}

fn month_params(month: Option<&str>) -> Vec<(&'static str, &str)> {
    month.map(|m| ("month", m)).into_iter().collect()
}
