//! Card number types.
//!
//! [`CardNumber`] holds a full primary account number for the duration of a
//! gateway request and never leaves the process unredacted: its `Debug` and
//! `Display` output is masked, and it deliberately implements neither
//! `Serialize` nor any database codec. [`MaskedCardNumber`] is the only card
//! form that may be persisted.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CardNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CardError {
    /// The input string is empty.
    #[error("card number cannot be empty")]
    Empty,
    /// The digit count is outside the accepted range.
    #[error("card number must be {min}-{max} digits (got {got})")]
    InvalidLength {
        /// Minimum accepted digit count.
        min: usize,
        /// Maximum accepted digit count.
        max: usize,
        /// Digit count of the input.
        got: usize,
    },
    /// The input contains a character other than digits, spaces, or hyphens.
    #[error("card number may only contain digits, spaces, and hyphens")]
    InvalidCharacter,
}

/// A full card number (PAN), validated but never persisted.
///
/// ## Constraints
///
/// - 12-19 digits (ISO/IEC 7812)
/// - Spaces and hyphens are accepted as separators and stripped
///
/// ## Examples
///
/// ```
/// use samplestore_core::CardNumber;
///
/// let card = CardNumber::parse("4111 1111 1111 1111").unwrap();
/// assert_eq!(card.last4(), "1111");
/// assert_eq!(card.mask().as_str(), "XXXX1111");
///
/// assert!(CardNumber::parse("").is_err());
/// assert!(CardNumber::parse("41x1").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber(String);

impl CardNumber {
    /// Minimum digit count (ISO/IEC 7812).
    pub const MIN_DIGITS: usize = 12;
    /// Maximum digit count (ISO/IEC 7812).
    pub const MAX_DIGITS: usize = 19;

    /// Parse a `CardNumber` from a string, stripping spaces and hyphens.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits and separators, or has an out-of-range digit count.
    pub fn parse(s: &str) -> Result<Self, CardError> {
        if s.is_empty() {
            return Err(CardError::Empty);
        }

        if !s.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-') {
            return Err(CardError::InvalidCharacter);
        }

        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(CardError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
                got: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the full digit string.
    ///
    /// Only the gateway wire layer should call this; everything else works
    /// with [`CardNumber::mask`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last four digits.
    #[must_use]
    pub fn last4(&self) -> &str {
        // Parse guarantees at least MIN_DIGITS digits.
        &self.0[self.0.len() - 4..]
    }

    /// Returns the masked form suitable for persistence and display.
    #[must_use]
    pub fn mask(&self) -> MaskedCardNumber {
        MaskedCardNumber(format!("XXXX{}", self.last4()))
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CardNumber").field(&self.mask().0).finish()
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mask().0)
    }
}

impl std::str::FromStr for CardNumber {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A masked card number in `XXXX` + last-4 form.
///
/// Produced by [`CardNumber::mask`], or constructed directly from values
/// that arrive already masked (gateway payloads, database rows).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskedCardNumber(String);

impl MaskedCardNumber {
    /// Wrap an already-masked value from the gateway or database.
    #[must_use]
    pub fn new(masked: impl Into<String>) -> Self {
        Self(masked.into())
    }

    /// Returns the masked value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MaskedCardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for MaskedCardNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for MaskedCardNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for MaskedCardNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed already masked
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for MaskedCardNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        assert!(CardNumber::parse("4111111111111111").is_ok());
        assert!(CardNumber::parse("4111 1111 1111 1111").is_ok());
        assert!(CardNumber::parse("4111-1111-1111-1111").is_ok());
        assert!(CardNumber::parse("371449635398431").is_ok()); // 15-digit Amex
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(CardNumber::parse(""), Err(CardError::Empty)));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            CardNumber::parse("41111111"),
            Err(CardError::InvalidLength { got: 8, .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "4".repeat(20);
        assert!(matches!(
            CardNumber::parse(&long),
            Err(CardError::InvalidLength { got: 20, .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            CardNumber::parse("4111x111111111"),
            Err(CardError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_mask() {
        let card = CardNumber::parse("4111111111111111").unwrap();
        assert_eq!(card.mask().as_str(), "XXXX1111");

        let card = CardNumber::parse("5424 0000 0000 0015").unwrap();
        assert_eq!(card.mask().as_str(), "XXXX0015");
    }

    #[test]
    fn test_debug_is_masked() {
        let card = CardNumber::parse("4111111111111111").unwrap();
        let debug = format!("{card:?}");
        assert!(debug.contains("XXXX1111"));
        assert!(!debug.contains("4111111111111111"));
    }

    #[test]
    fn test_display_is_masked() {
        let card = CardNumber::parse("4111111111111111").unwrap();
        assert_eq!(format!("{card}"), "XXXX1111");
    }

    #[test]
    fn test_masked_serde_roundtrip() {
        let masked = CardNumber::parse("4111111111111111").unwrap().mask();
        let json = serde_json::to_string(&masked).unwrap();
        assert_eq!(json, "\"XXXX1111\"");

        let parsed: MaskedCardNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, masked);
    }

    #[test]
    fn test_from_str() {
        let card: CardNumber = "4111111111111111".parse().unwrap();
        assert_eq!(card.last4(), "1111");
    }
}
