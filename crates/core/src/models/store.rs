//! Merchant stores and the store form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{StoreId, UserId, timestamp};
use crate::validation::{ValidationError, required_text};

/// A merchant's store. One per merchant, enforced by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Backend store ID.
    pub id: StoreId,
    /// Owning merchant, when the endpoint includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<UserId>,
    /// Store name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Stamps needed to complete a card.
    pub stamps_required: u32,
    /// What the customer gets on completion.
    pub reward_description: String,
    /// Inactive stores do not accept stamps.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Creation time.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "timestamp::deserialize_option"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

const fn default_active() -> bool {
    true
}

/// Validated contents of the create/update store form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDraft {
    name: String,
    description: String,
    stamps_required: u32,
    reward_description: String,
}

impl StoreDraft {
    /// Fewest stamps a store may require.
    pub const MIN_STAMPS: u32 = 3;

    /// Most stamps a store may require.
    pub const MAX_STAMPS: u32 = 20;

    /// Default shown on a new store form.
    pub const DEFAULT_STAMPS: u32 = 10;

    /// Validate a store form.
    ///
    /// Text fields are trimmed; `stamps_required` is the raw form input.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for the first field that fails, checked
    /// in form order: name, description, stamps required, reward.
    pub fn new(
        name: &str,
        description: &str,
        stamps_required: &str,
        reward_description: &str,
    ) -> Result<Self, ValidationError> {
        let name = required_text("store name", name)?;
        let description = required_text("store description", description)?;
        let stamps_required = parse_stamps_required(stamps_required)?;
        let reward_description = required_text("reward description", reward_description)?;

        Ok(Self {
            name,
            description,
            stamps_required,
            reward_description,
        })
    }

    /// Store name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stamps needed to complete a card.
    #[must_use]
    pub const fn stamps_required(&self) -> u32 {
        self.stamps_required
    }

    /// Reward description.
    #[must_use]
    pub fn reward_description(&self) -> &str {
        &self.reward_description
    }
}

fn parse_stamps_required(input: &str) -> Result<u32, ValidationError> {
    const FIELD: &str = "stamps required";

    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field: FIELD,
            value: input.to_owned(),
        })?;

    let range = i64::from(StoreDraft::MIN_STAMPS)..=i64::from(StoreDraft::MAX_STAMPS);
    if !range.contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: FIELD,
            value,
            min: *range.start(),
            max: *range.end(),
        });
    }

    u32::try_from(value).map_err(|_| ValidationError::NotANumber {
        field: FIELD,
        value: input.to_owned(),
    })
}
