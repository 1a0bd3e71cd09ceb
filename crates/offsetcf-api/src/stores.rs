// Store endpoints
//
// Store CRUD. Listing is merchant-scoped (`/merchants/{id}/stores`);
// everything else addresses `/stores/{id}` directly.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{NewStore, Store, StoreUpdate};

impl ApiClient {
    /// Create a store under a merchant.
    ///
    /// `POST /stores`
    pub async fn create_store(&self, store: &NewStore) -> Result<Store, Error> {
        let url = self.url(&["stores"])?;
        debug!(merchant_id = %store.merchant_id, domain = %store.domain, "creating store");
        self.post(url, store).await
    }

    /// List all stores owned by a merchant.
    ///
    /// `GET /merchants/{merchantId}/stores`
    pub async fn list_stores(&self, merchant_id: &str) -> Result<Vec<Store>, Error> {
        let url = self.url(&["merchants", merchant_id, "stores"])?;
        debug!(merchant_id, "listing stores");
        self.get(url, &[]).await
    }

    /// Update a store (name, domain, or widget configuration).
    ///
    /// `PUT /stores/{id}`
    pub async fn update_store(&self, id: &str, update: &StoreUpdate) -> Result<Store, Error> {
        let url = self.url(&["stores", id])?;
        debug!(id, "updating store");
        self.put(url, update).await
    }

    /// Delete a store.
    ///
    /// `DELETE /stores/{id}`
    pub async fn delete_store(&self, id: &str) -> Result<(), Error> {
        let url = self.url(&["stores", id])?;
        debug!(id, "deleting store");
        self.delete(url).await
    }
}
