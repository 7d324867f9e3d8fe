//! ISO-3166 alpha-2 country code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CountryCodeError {
    /// The input string is empty.
    #[error("country code cannot be empty")]
    Empty,
    /// The input is not two ASCII letters.
    #[error("country code must be two ASCII letters, got {0:?}")]
    Malformed(String),
}

/// An ISO-3166 alpha-2 country code (e.g. `AT`, `DE`).
///
/// Normalized to uppercase on parse. Only the shape is validated; this type
/// does not check the code against the ISO registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a `CountryCode` from a string, normalizing to uppercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or is not exactly two ASCII
    /// letters.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CountryCodeError::Empty);
        }
        if s.len() != 2 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CountryCodeError::Malformed(s.to_owned()));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the country code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases() {
        assert_eq!(CountryCode::parse("at").unwrap().as_str(), "AT");
        assert_eq!(CountryCode::parse("De").unwrap().as_str(), "DE");
    }

    #[test]
    fn test_parse_trims() {
        assert_eq!(CountryCode::parse(" AT ").unwrap().as_str(), "AT");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(CountryCode::parse(""), Err(CountryCodeError::Empty)));
        assert!(matches!(
            CountryCode::parse("AUT"),
            Err(CountryCodeError::Malformed(_))
        ));
        assert!(matches!(
            CountryCode::parse("A1"),
            Err(CountryCodeError::Malformed(_))
        ));
    }
}
