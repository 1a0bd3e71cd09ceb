// ── Console facade ──
//
// Single entry point for the merchant console: validated merchant and
// store operations plus the opt-in summary source that backs the
// reporting view. Cheap to clone; all clones share one HTTP client.

use std::sync::Arc;

use tracing::{debug, info};

use offsetcf_api::{ApiClient, Merchant, Store, TransportConfig};

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::export::ExportFile;
use crate::model::{DEFAULT_CURRENCY, Month, MonthlySummary, OptInFilters};
use crate::reporting::{ReportingView, SummarySource};
use crate::validation::{MerchantForm, MerchantPatch, StoreForm, StorePatch};

#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    api: ApiClient,
}

impl Console {
    /// Build a console and its HTTP client from `config`.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let api = ApiClient::new(config.api_url.clone(), &transport)?;
        Ok(Self::with_client(config, api))
    }

    /// Use an already-built client (tests point this at a mock server).
    pub fn with_client(config: ConsoleConfig, api: ApiClient) -> Self {
        Self {
            inner: Arc::new(ConsoleInner { config, api }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// An idle reporting view backed by this console.
    pub fn reporting_view(&self, filters: OptInFilters) -> ReportingView<Self> {
        ReportingView::new(self.clone(), filters)
    }

    // ── Merchants ────────────────────────────────────────────────────

    pub async fn register_merchant(&self, form: MerchantForm) -> Result<Merchant, CoreError> {
        let body = form.validate()?;
        info!(email = %body.email, company = %body.company, "registering merchant");
        Ok(self.inner.api.register_merchant(&body).await?)
    }

    pub async fn get_merchant(&self, id: &str) -> Result<Merchant, CoreError> {
        self.inner
            .api
            .get_merchant(id)
            .await
            .map_err(|e| entity_error(e, "merchant", id))
    }

    pub async fn update_merchant(
        &self,
        id: &str,
        patch: MerchantPatch,
    ) -> Result<Merchant, CoreError> {
        let body = patch.validate()?;
        info!(id, "updating merchant");
        self.inner
            .api
            .update_merchant(id, &body)
            .await
            .map_err(|e| entity_error(e, "merchant", id))
    }

    // ── Stores ───────────────────────────────────────────────────────

    pub async fn create_store(
        &self,
        merchant_id: &str,
        form: StoreForm,
    ) -> Result<Store, CoreError> {
        let body = form.validate(merchant_id)?;
        info!(merchant_id, domain = %body.domain, "creating store");
        Ok(self.inner.api.create_store(&body).await?)
    }

    pub async fn list_stores(&self, merchant_id: &str) -> Result<Vec<Store>, CoreError> {
        self.inner
            .api
            .list_stores(merchant_id)
            .await
            .map_err(|e| entity_error(e, "merchant", merchant_id))
    }

    /// One store of a merchant, found through the merchant's store list.
    pub async fn find_store(&self, merchant_id: &str, store_id: &str) -> Result<Store, CoreError> {
        self.list_stores(merchant_id)
            .await?
            .into_iter()
            .find(|s| s.id == store_id)
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "store".into(),
                identifier: store_id.into(),
            })
    }

    /// Apply `patch` on top of the store's current settings.
    pub async fn update_store(
        &self,
        merchant_id: &str,
        store_id: &str,
        patch: StorePatch,
    ) -> Result<Store, CoreError> {
        patch.check()?;
        let current = self.find_store(merchant_id, store_id).await?;
        let body = patch.apply(&current)?;
        info!(store_id, "updating store");
        self.inner
            .api
            .update_store(store_id, &body)
            .await
            .map_err(|e| entity_error(e, "store", store_id))
    }

    /// Turn the storefront widget on or off.
    pub async fn set_widget_enabled(
        &self,
        merchant_id: &str,
        store_id: &str,
        enabled: bool,
    ) -> Result<Store, CoreError> {
        let patch = StorePatch {
            enabled: Some(enabled),
            ..StorePatch::default()
        };
        self.update_store(merchant_id, store_id, patch).await
    }

    pub async fn delete_store(&self, store_id: &str) -> Result<(), CoreError> {
        info!(store_id, "deleting store");
        self.inner
            .api
            .delete_store(store_id)
            .await
            .map_err(|e| entity_error(e, "store", store_id))
    }
}

// ── Opt-in summary source ────────────────────────────────────────────

impl SummarySource for Console {
    /// A 404 means the store has no recorded activity and reads as an
    /// empty month.
    async fn monthly_summary(&self, filters: &OptInFilters) -> Result<MonthlySummary, CoreError> {
        let store = filters.scoped_store()?;
        let month = filters.month_param();

        let response = match self.inner.api.monthly_summary(store, month.as_deref()).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                debug!(store, ?month, "monthly summary not found (404), treating as empty");
                let month = filters.month().unwrap_or_else(Month::current);
                return Ok(MonthlySummary::empty(store, month, DEFAULT_CURRENCY));
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(requested) = &month {
            if &response.month != requested {
                return Err(CoreError::InvalidSummary {
                    reason: format!("asked for {requested}, got {}", response.month),
                });
            }
        }
        if response.store != store {
            return Err(CoreError::InvalidSummary {
                reason: format!("asked for store {store}, got {}", response.store),
            });
        }
        MonthlySummary::try_from(response)
    }

    async fn export(&self, filters: &OptInFilters) -> Result<ExportFile, CoreError> {
        let store = filters.scoped_store()?;
        let month = filters.month_param();

        let bytes = self
            .inner
            .api
            .export_monthly_summary(store, month.as_deref())
            .await
            .map_err(|e| entity_error(e, "export", store))?;
        debug!(store, ?month, bytes = bytes.len(), "export downloaded");
        Ok(ExportFile::new(filters.clone(), bytes))
    }
}

/// 404 becomes [`CoreError::NotFound`]; everything else maps as usual.
fn entity_error(err: offsetcf_api::Error, entity_type: &str, identifier: &str) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            entity_type: entity_type.to_owned(),
            identifier: identifier.to_owned(),
        }
    } else {
        err.into()
    }
}
