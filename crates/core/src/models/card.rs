//! Loyalty cards and their stamp history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    CardId, StampEventId, StampSlot, StoreId, UserId, progress_percentage, stamp_slots, timestamp,
};

/// The store summary embedded in a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStore {
    /// Store ID.
    pub id: StoreId,
    /// Store name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Stamps needed to complete the card.
    pub stamps_required: u32,
    /// What the customer gets on completion.
    pub reward_description: String,
}

/// A customer's progress toward one store's reward.
///
/// `is_completed` is reported by the backend and trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyCard {
    /// Card ID.
    pub id: CardId,
    /// The store this card belongs to.
    pub store: CardStore,
    /// Stamps collected so far.
    pub stamps_count: u32,
    /// Whether the reward can be redeemed.
    pub is_completed: bool,
    /// When the card was completed.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub completed_at: Option<DateTime<Utc>>,
    /// When the card was created.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl LoyaltyCard {
    /// Percentage of the required stamps collected.
    #[must_use]
    pub fn progress(&self) -> f64 {
        progress_percentage(self.stamps_count, self.store.stamps_required)
    }

    /// Stamp grid for rendering.
    #[must_use]
    pub fn slots(&self) -> Vec<StampSlot> {
        stamp_slots(self.stamps_count, self.store.stamps_required)
    }

    /// Stamps still missing, zero once complete.
    #[must_use]
    pub const fn stamps_remaining(&self) -> u32 {
        self.store.stamps_required.saturating_sub(self.stamps_count)
    }

    /// Only completed cards can be redeemed.
    #[must_use]
    pub const fn can_redeem(&self) -> bool {
        self.is_completed
    }
}

/// One stamp applied to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampEvent {
    /// Event ID.
    pub id: StampEventId,
    /// When the stamp was applied.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub stamped_at: DateTime<Utc>,
    /// Merchant who applied it.
    pub stamped_by: UserId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn card(stamps_count: u32, stamps_required: u32, is_completed: bool) -> LoyaltyCard {
        let json = serde_json::json!({
            "id": 9,
            "store": {
                "id": 2,
                "name": "Café",
                "description": "Cafeteria",
                "stamps_required": stamps_required,
                "reward_description": "Um café grátis"
            },
            "stamps_count": stamps_count,
            "is_completed": is_completed,
            "created_at": "2024-05-01T12:00:00Z"
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_partial_card() {
        let card = card(7, 10, false);
        assert!((card.progress() - 70.0).abs() < f64::EPSILON);
        assert!(!card.is_completed);
        assert!(!card.can_redeem());
        assert_eq!(card.stamps_remaining(), 3);
        assert_eq!(card.completed_at, None);
    }

    #[test]
    fn test_completed_card() {
        let card = card(10, 10, true);
        assert!((card.progress() - 100.0).abs() < f64::EPSILON);
        assert!(card.can_redeem());
        assert_eq!(card.stamps_remaining(), 0);
        assert!(card.slots().iter().all(|s| *s == StampSlot::Filled));
    }

    #[test]
    fn test_negative_stamps_rejected() {
        let json = serde_json::json!({
            "id": 1,
            "store": {
                "id": 1,
                "name": "x",
                "stamps_required": 5,
                "reward_description": "y"
            },
            "stamps_count": -1,
            "is_completed": false,
            "created_at": "2024-05-01T12:00:00Z"
        });
        assert!(serde_json::from_value::<LoyaltyCard>(json).is_err());
    }

    #[test]
    fn test_stamp_event() {
        let event: StampEvent = serde_json::from_str(
            r#"{"id": 4, "stamped_at": "2024-05-02T08:30:00.000Z", "stamped_by": 3}"#,
        )
        .unwrap();
        assert_eq!(event.stamped_by, UserId::new(3));
    }

    #[test]
    fn test_naive_timestamps_accepted() {
        let cards: Vec<LoyaltyCard> = serde_json::from_value(serde_json::json!([{
            "id": 9,
            "store": {
                "id": 2,
                "name": "Café",
                "stamps_required": 10,
                "reward_description": "Um café grátis"
            },
            "stamps_count": 10,
            "is_completed": true,
            "completed_at": "2024-01-20 18:05:00.123+00",
            "created_at": "2024-01-15 10:30:00"
        }]))
        .unwrap();

        assert_eq!(cards[0].created_at.to_rfc3339(), "2024-01-15T10:30:00+00:00");
        assert!(cards[0].completed_at.is_some());
    }

    #[test]
    fn test_null_completed_at() {
        let json = serde_json::json!({
            "id": 9,
            "store": {
                "id": 2,
                "name": "Café",
                "stamps_required": 10,
                "reward_description": "Um café grátis"
            },
            "stamps_count": 1,
            "is_completed": false,
            "completed_at": null,
            "created_at": "2024-05-01T12:00:00Z"
        });
        let card: LoyaltyCard = serde_json::from_value(json).unwrap();
        assert_eq!(card.completed_at, None);
    }
}
