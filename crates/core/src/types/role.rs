//! User roles.

use serde::{Deserialize, Serialize};

/// Which side of the loyalty program an account is on.
///
/// Serialized as the backend's `user_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Collects stamps on loyalty cards.
    #[default]
    Customer,
    /// Owns a store and issues stamps.
    Merchant,
}

impl UserRole {
    /// Returns `true` for merchant accounts.
    #[must_use]
    pub const fn is_merchant(self) -> bool {
        matches!(self, Self::Merchant)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Merchant => write!(f, "merchant"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "merchant" => Ok(Self::Merchant),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::Merchant).unwrap(),
            "\"merchant\""
        );
        let role: UserRole = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(role, UserRole::Customer);
    }

    #[test]
    fn test_from_str_round_trip() {
        for role in [UserRole::Customer, UserRole::Merchant] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
        assert!("admin".parse::<UserRole>().is_err());
    }
}
