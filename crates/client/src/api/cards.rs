//! A customer's loyalty cards.

use tracing::instrument;

use cartaozinho_core::{CardId, LoyaltyCard, StampEvent, UserId};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// List all cards held by a customer.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn customer_cards(&self, customer_id: UserId) -> Result<Vec<LoyaltyCard>, ApiError> {
        self.get(&format!("/cards/customer/{customer_id}")).await
    }

    /// Fetch one card.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the card does not exist.
    #[instrument(skip(self))]
    pub async fn card(&self, card_id: CardId) -> Result<LoyaltyCard, ApiError> {
        self.get(&format!("/cards/{card_id}")).await
    }

    /// Fetch a card's stamp history, oldest first as sent by the backend.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn card_history(&self, card_id: CardId) -> Result<Vec<StampEvent>, ApiError> {
        self.get(&format!("/cards/{card_id}/history")).await
    }

    /// Redeem a completed card, resetting its stamps to zero.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend refuses the reset.
    #[instrument(skip(self))]
    pub async fn reset_card(&self, card_id: CardId) -> Result<(), ApiError> {
        self.post_ack(&format!("/cards/{card_id}/reset")).await
    }
}
