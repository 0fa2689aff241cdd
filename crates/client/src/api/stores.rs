//! A merchant's store and its customers.

use serde::Serialize;
use tracing::{debug, instrument};

use cartaozinho_core::{Store, StoreCustomer, StoreDraft, StoreId, UserId};

use super::{ApiClient, ApiError};

/// Body of `POST /stores` and `PUT /stores/:id`.
#[derive(Debug, Serialize)]
struct StoreBody<'a> {
    merchant_id: UserId,
    name: &'a str,
    description: &'a str,
    stamps_required: u32,
    reward_description: &'a str,
}

impl<'a> StoreBody<'a> {
    fn new(merchant_id: UserId, draft: &'a StoreDraft) -> Self {
        Self {
            merchant_id,
            name: draft.name(),
            description: draft.description(),
            stamps_required: draft.stamps_required(),
            reward_description: draft.reward_description(),
        }
    }
}

impl ApiClient {
    /// Fetch the store owned by a merchant.
    ///
    /// Returns `Ok(None)` if the merchant has not created one yet.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails for any other reason.
    #[instrument(skip(self))]
    pub async fn merchant_store(&self, merchant_id: UserId) -> Result<Option<Store>, ApiError> {
        match self.get(&format!("/stores/merchant/{merchant_id}")).await {
            Ok(store) => Ok(Some(store)),
            Err(e) if e.is_not_found() => {
                debug!("Merchant has no store yet");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// List the customers holding a card at a store, with their progress.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn store_customers(&self, store_id: StoreId) -> Result<Vec<StoreCustomer>, ApiError> {
        self.get(&format!("/stores/{store_id}/customers")).await
    }

    /// Create a store for a merchant.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects the store.
    #[instrument(skip(self, draft), fields(name = %draft.name()))]
    pub async fn create_store(
        &self,
        merchant_id: UserId,
        draft: &StoreDraft,
    ) -> Result<Store, ApiError> {
        self.post("/stores", &StoreBody::new(merchant_id, draft))
            .await
    }

    /// Replace a store's editable fields.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects the update.
    #[instrument(skip(self, draft), fields(name = %draft.name()))]
    pub async fn update_store(
        &self,
        store_id: StoreId,
        merchant_id: UserId,
        draft: &StoreDraft,
    ) -> Result<Store, ApiError> {
        self.put(
            &format!("/stores/{store_id}"),
            &StoreBody::new(merchant_id, draft),
        )
        .await
    }

    /// Flip a store's active flag.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn toggle_store(&self, store_id: StoreId) -> Result<(), ApiError> {
        self.put_ack(&format!("/stores/{store_id}/toggle")).await
    }
}
