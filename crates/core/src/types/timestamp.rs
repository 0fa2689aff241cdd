//! Backend timestamps.
//!
//! Most columns arrive as RFC 3339, but some come straight from the database
//! as `YYYY-MM-DD HH:MM:SS[.ffffff][+00]` or without any offset. Values
//! without an offset are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de};

/// Formats carrying an offset, tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Formats without an offset.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a timestamp in any of the shapes the backend produces.
///
/// ```
/// use cartaozinho_core::parse_timestamp;
///
/// let strict = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
/// assert_eq!(parse_timestamp("2024-01-15 10:30:00"), Some(strict));
/// assert_eq!(parse_timestamp("2024-01-15 07:30:00-03"), Some(strict));
/// assert_eq!(parse_timestamp("yesterday"), None);
/// ```
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }

    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        .map(|at| at.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|at| at.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|at| at.and_utc())
        })
}

/// `deserialize_with` target for a required timestamp.
///
/// # Errors
///
/// Fails if the value is not a string in a recognized format.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| de::Error::custom(format!("unrecognized timestamp {raw:?}")))
}

/// `deserialize_with` target for an optional timestamp; pair it with
/// `#[serde(default)]`.
///
/// # Errors
///
/// Fails if a value is present and not a string in a recognized format.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            parse_timestamp(&raw)
                .ok_or_else(|| de::Error::custom(format!("unrecognized timestamp {raw:?}")))
        })
        .transpose()
}
