//! Brazilian phone numbers.
//!
//! Users type their number into a masked field (`(XX) XXXXX-XXXX`); the
//! backend identifies accounts by the `+55`-prefixed digit string. This
//! module owns both representations.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The masked input is shorter than a complete number.
    #[error("phone number is too short ({length} characters, need at least {min})")]
    TooShort {
        /// Length of the masked input.
        length: usize,
        /// Minimum masked length.
        min: usize,
    },
    /// The input has more digits than a local number can have.
    #[error("phone number has {digits} digits, at most {max} allowed")]
    TooLong {
        /// Number of digits found.
        digits: usize,
        /// Maximum number of local digits.
        max: usize,
    },
}

/// A validated phone number in wire format (`+55` followed by local digits).
///
/// ## Constraints
///
/// - The masked local form must be at least 14 characters, i.e.
///   `(XX) XXXX-XXXX` or longer
/// - At most 11 local digits (2-digit area code plus 9-digit mobile number)
///
/// ## Examples
///
/// ```
/// use cartaozinho_core::Phone;
///
/// let phone = Phone::parse("(11) 98765-4321").unwrap();
/// assert_eq!(phone.as_str(), "+5511987654321");
///
/// // Raw digits and already-prefixed numbers are accepted too
/// assert_eq!(Phone::parse("11987654321").unwrap(), phone);
/// assert_eq!(Phone::parse("+5511987654321").unwrap(), phone);
///
/// // Incomplete numbers are rejected before anything is sent
/// assert!(Phone::parse("(11) 9999-999").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Country calling code prepended to every local number.
    pub const COUNTRY_PREFIX: &'static str = "+55";

    /// Shortest masked input accepted as a complete number.
    pub const MIN_MASKED_LENGTH: usize = 14;

    /// Maximum number of local digits.
    pub const MAX_DIGITS: usize = 11;

    /// Parse a phone number from user input.
    ///
    /// The input may be masked (`(11) 98765-4321`), raw digits, or already
    /// carry the `+55` prefix. It is masked with [`format_phone`] and must
    /// then be at least [`Self::MIN_MASKED_LENGTH`] characters long.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Has more than 11 local digits
    /// - Masks to fewer than 14 characters
    pub fn parse(input: &str) -> Result<Self, PhoneError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let local = trimmed
            .strip_prefix(Self::COUNTRY_PREFIX)
            .unwrap_or(trimmed);
        let digits = strip_non_digits(local);

        if digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                digits: digits.len(),
                max: Self::MAX_DIGITS,
            });
        }

        let masked = format_phone(&digits);
        if masked.len() < Self::MIN_MASKED_LENGTH {
            return Err(PhoneError::TooShort {
                length: masked.len(),
                min: Self::MIN_MASKED_LENGTH,
            });
        }

        Ok(Self(format!("{}{digits}", Self::COUNTRY_PREFIX)))
    }

    /// Returns the wire form (`+55...`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the local digits without the country prefix.
    #[must_use]
    pub fn local_digits(&self) -> &str {
        self.0
            .strip_prefix(Self::COUNTRY_PREFIX)
            .unwrap_or(&self.0)
    }

    /// Returns the number masked for display.
    #[must_use]
    pub fn masked(&self) -> String {
        format_phone(self.local_digits())
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Apply the `(XX) XXXXX-XXXX` input mask.
///
/// Non-digits are discarded first. Partial input gets a partial mask:
/// fewer than 3 digits are returned as-is, 3 to 7 digits get the area code
/// in parentheses, and 8 or more get the full mask. Input with more than 11
/// digits is returned unchanged.
///
/// ```
/// use cartaozinho_core::format_phone;
///
/// assert_eq!(format_phone("11"), "11");
/// assert_eq!(format_phone("11987"), "(11) 987");
/// assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
/// ```
#[must_use]
pub fn format_phone(input: &str) -> String {
    let digits = strip_non_digits(input);

    match digits.len() {
        len if len > Phone::MAX_DIGITS => input.to_owned(),
        0..=2 => digits,
        3..=7 => format!("({}) {}", segment(&digits, 0, 2), segment(&digits, 2, 11)),
        _ => format!(
            "({}) {}-{}",
            segment(&digits, 0, 2),
            segment(&digits, 2, 7),
            segment(&digits, 7, 11)
        ),
    }
}

/// Format a stored `+55` number for display.
///
/// Exactly 11 local digits are masked as `(XX) XXXXX-XXXX`; anything else is
/// returned unchanged.
#[must_use]
pub fn display_phone(stored: &str) -> String {
    let local = stored.replacen(Phone::COUNTRY_PREFIX, "", 1);
    let digits = strip_non_digits(&local);

    if digits.len() == Phone::MAX_DIGITS {
        format!(
            "({}) {}-{}",
            segment(&digits, 0, 2),
            segment(&digits, 2, 7),
            segment(&digits, 7, 11)
        )
    } else {
        stored.to_owned()
    }
}

/// Keep only ASCII digits.
#[must_use]
pub fn strip_non_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Byte range of an ASCII digit string, clamped to its length.
fn segment(digits: &str, start: usize, end: usize) -> &str {
    let end = end.min(digits.len());
    digits.get(start.min(end)..end).unwrap_or("")
}
