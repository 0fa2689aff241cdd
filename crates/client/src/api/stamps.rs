//! Customer search and stamp issuing.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use cartaozinho_core::{CustomerMatch, Phone, StoreId, UserId};

use super::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    phone: &'a str,
    store_id: StoreId,
}

#[derive(Debug, Serialize)]
struct AddStampRequest {
    customer_id: UserId,
    store_id: StoreId,
    stamped_by: UserId,
}

/// Response of `POST /stamps/add`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StampReceipt {
    /// Whether the stamp was recorded.
    pub success: bool,
    /// Confirmation text, e.g. "Carimbo adicionado! 3/10".
    #[serde(default)]
    pub message: Option<String>,
    /// Rejection reason when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiClient {
    /// Look up a customer by phone, with their progress at `store_id`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no customer uses this phone.
    #[instrument(skip(self, phone), fields(phone = %phone))]
    pub async fn search_customer(
        &self,
        phone: &Phone,
        store_id: StoreId,
    ) -> Result<CustomerMatch, ApiError> {
        self.post(
            "/customers/search",
            &SearchRequest {
                phone: phone.as_str(),
                store_id,
            },
        )
        .await
    }

    /// Add one stamp to a customer's card at a store.
    ///
    /// Not idempotent: each call adds a stamp.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` if the backend answers without `success`,
    /// carrying its `error` text, or any other `ApiError` if the request
    /// fails.
    #[instrument(skip(self))]
    pub async fn add_stamp(
        &self,
        customer_id: UserId,
        store_id: StoreId,
        stamped_by: UserId,
    ) -> Result<StampReceipt, ApiError> {
        let receipt: StampReceipt = self
            .post(
                "/stamps/add",
                &AddStampRequest {
                    customer_id,
                    store_id,
                    stamped_by,
                },
            )
            .await?;

        if !receipt.success {
            return Err(ApiError::Api {
                status: 200,
                message: receipt
                    .error
                    .clone()
                    .unwrap_or_else(|| "Erro ao adicionar carimbo".to_string()),
            });
        }

        info!(message = ?receipt.message, "Stamp added");
        Ok(receipt)
    }
}
