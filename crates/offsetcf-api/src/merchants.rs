// Merchant endpoints
//
// Registration, lookup, and profile updates. Merchants are never
// deleted through this API.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Merchant, MerchantUpdate, NewMerchant};

impl ApiClient {
    /// Register a new merchant.
    ///
    /// `POST /merchants`
    pub async fn register_merchant(&self, merchant: &NewMerchant) -> Result<Merchant, Error> {
        let url = self.url(&["merchants"])?;
        debug!(email = %merchant.email, "registering merchant");
        self.post(url, merchant).await
    }

    /// Fetch a merchant by id.
    ///
    /// `GET /merchants/{id}`
    pub async fn get_merchant(&self, id: &str) -> Result<Merchant, Error> {
        let url = self.url(&["merchants", id])?;
        debug!(id, "fetching merchant");
        self.get(url, &[]).await
    }

    /// Update a merchant's profile.
    ///
    /// `PUT /merchants/{id}`
    pub async fn update_merchant(
        &self,
        id: &str,
        update: &MerchantUpdate,
    ) -> Result<Merchant, Error> {
        let url = self.url(&["merchants", id])?;
        debug!(id, "updating merchant");
        self.put(url, update).await
    }
}
