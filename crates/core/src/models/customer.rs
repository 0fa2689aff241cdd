//! Customers as seen from a merchant's store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CardId, UserId, display_phone, timestamp};

/// One row of a store's customer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCustomer {
    /// Customer account ID.
    pub id: UserId,
    /// Customer name.
    pub name: String,
    /// Phone number in wire format.
    pub phone: String,
    /// Stamps on this store's card.
    pub stamps_count: u32,
    /// Whether the card is complete.
    pub is_completed: bool,
    /// The customer's card at this store.
    pub card_id: CardId,
    /// When the card was created.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub card_created_at: DateTime<Utc>,
}

impl StoreCustomer {
    /// Phone number masked for display.
    #[must_use]
    pub fn display_phone(&self) -> String {
        display_phone(&self.phone)
    }
}

/// Result of searching a customer by phone within a store.
///
/// Customers without a card at the store yet come back with zero stamps and
/// no card ID; the first stamp creates the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerMatch {
    /// Customer account ID.
    pub id: UserId,
    /// Customer name.
    pub name: String,
    /// Phone number in wire format.
    pub phone: String,
    /// Stamps on this store's card.
    #[serde(default)]
    pub stamps_count: u32,
    /// Whether the card is complete.
    #[serde(default)]
    pub is_completed: bool,
    /// The customer's card at this store, if one exists.
    #[serde(default)]
    pub card_id: Option<CardId>,
}

impl CustomerMatch {
    /// Phone number masked for display.
    #[must_use]
    pub fn display_phone(&self) -> String {
        display_phone(&self.phone)
    }
}
