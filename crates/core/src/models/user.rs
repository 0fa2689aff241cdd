//! User accounts.

use serde::{Deserialize, Serialize};

use crate::types::{UserId, UserRole, display_phone};

/// A registered account, as returned by the login and register endpoints.
///
/// This is the record the client keeps as its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend account ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Phone number in wire format (`+55...`).
    pub phone: String,
    /// Customer or merchant.
    pub user_type: UserRole,
    /// Push token registered for this account, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expo_push_token: Option<String>,
}

impl User {
    /// Phone number masked for display.
    #[must_use]
    pub fn display_phone(&self) -> String {
        display_phone(&self.phone)
    }

    /// First letter of the name, uppercased, for avatars.
    #[must_use]
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }
}
