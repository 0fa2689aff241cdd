//! Backend health report.

use serde::{Deserialize, Serialize};

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall status label, `"ok"` when healthy.
    pub status: String,
    /// Database connectivity.
    pub database: DatabaseHealth,
    /// Server uptime in seconds.
    #[serde(default)]
    pub uptime: f64,
}

/// Database section of the health report.
///
/// Older backends report a plain label, newer ones an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatabaseHealth {
    /// `{"connected": true}`
    Detailed {
        /// Whether the backend reached its database.
        connected: bool,
    },
    /// `"connected"`, `"disconnected"`, ...
    Label(String),
}

impl DatabaseHealth {
    /// Whether the database is reachable.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        match self {
            Self::Detailed { connected } => *connected,
            Self::Label(label) => label.eq_ignore_ascii_case("connected"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_detailed_database() {
        let report: HealthReport = serde_json::from_str(
            r#"{"status": "ok", "database": {"connected": true}, "uptime": 12.5}"#,
        )
        .unwrap();
        assert!(report.database.is_connected());
    }

    #[test]
    fn test_label_database() {
        let report: HealthReport =
            serde_json::from_str(r#"{"status": "ok", "database": "disconnected"}"#).unwrap();
        assert!(!report.database.is_connected());
        assert!(report.uptime.abs() < f64::EPSILON);
    }
}
