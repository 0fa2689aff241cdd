//! Push notifications to a store's customers.

use serde::Serialize;
use tracing::{info, instrument};

use cartaozinho_core::{NotificationDraft, NotificationReceipt, StoreId, UserId};

use super::{ApiClient, ApiError};

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    store_id: StoreId,
    title: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_id: Option<UserId>,
}

impl ApiClient {
    /// Send a notification to one customer, or to every customer of the
    /// store when `customer_id` is `None`.
    ///
    /// A receipt with `success == false` is returned as-is; the backend uses
    /// it for "nobody to notify".
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, draft), fields(title = %draft.title()))]
    pub async fn send_notification(
        &self,
        store_id: StoreId,
        draft: &NotificationDraft,
        customer_id: Option<UserId>,
    ) -> Result<NotificationReceipt, ApiError> {
        let receipt: NotificationReceipt = self
            .post(
                "/notifications/send",
                &SendRequest {
                    store_id,
                    title: draft.title(),
                    message: draft.message(),
                    customer_id,
                },
            )
            .await?;

        info!(
            success = receipt.success,
            sent_count = receipt.sent_count,
            "Notification dispatched"
        );
        Ok(receipt)
    }
}
