//! VAT identifier format validation.
//!
//! EU VAT identifiers carry a country prefix and a country-specific body
//! (e.g. `ATU12345678` for Austria, `DE123456789` for Germany). The
//! [`VatRegistry`] holds one format rule per country, keyed by ISO-3166
//! alpha-2 code, and ships with defaults covering the EU member states.
//!
//! Rules are format checks only. Per-country checksum arithmetic is out of
//! scope; deployments that need it can [`register`](VatRegistry::register)
//! a stricter rule for the countries they care about.

use std::collections::HashMap;

use regex::Regex;

use crate::types::CountryCode;

/// Default format rules, keyed by country code.
///
/// Patterns are the commonly published EU VAT number shapes. They are
/// anchored by the registry before compilation.
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("AT", r"ATU\d{8}"),
    ("BE", r"BE0?\d{9}"),
    ("BG", r"BG\d{9,10}"),
    ("CY", r"CY\d{8}[A-Z]"),
    ("CZ", r"CZ\d{8,10}"),
    ("DE", r"DE\d{9}"),
    ("DK", r"DK\d{8}"),
    ("EE", r"EE\d{9}"),
    ("ES", r"ES[A-Z0-9]\d{7}[A-Z0-9]"),
    ("FI", r"FI\d{8}"),
    ("FR", r"FR[A-Z0-9]{2}\d{9}"),
    ("GB", r"GB(\d{9}|\d{12}|(GD|HA)\d{3})"),
    ("GR", r"EL\d{9}"),
    ("HR", r"HR\d{11}"),
    ("HU", r"HU\d{8}"),
    ("IE", r"IE\d{7}[A-W][A-I]?"),
    ("IT", r"IT\d{11}"),
    ("LT", r"LT(\d{9}|\d{12})"),
    ("LU", r"LU\d{8}"),
    ("LV", r"LV\d{11}"),
    ("MT", r"MT\d{8}"),
    ("NL", r"NL\d{9}B\d{2}"),
    ("PL", r"PL\d{10}"),
    ("PT", r"PT\d{9}"),
    ("RO", r"RO\d{2,10}"),
    ("SE", r"SE\d{12}"),
    ("SI", r"SI\d{8}"),
    ("SK", r"SK\d{10}"),
];

/// Errors produced by the VAT registry.
#[derive(thiserror::Error, Debug)]
pub enum VatError {
    /// A rule pattern failed to compile.
    #[error("invalid VAT pattern for {country}: {source}")]
    InvalidPattern {
        /// Country the rule was being registered for.
        country: String,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// A rule was registered against a malformed country code.
    #[error("invalid country code in VAT rule: {0}")]
    InvalidCountry(String),

    /// The VAT id does not match the rule for its country, or the country
    /// has no registered rule.
    #[error("vat id has a wrong format for country {country}")]
    WrongFormat {
        /// Country the VAT id was validated against.
        country: String,
    },
}

/// Per-country VAT identifier format rules.
///
/// # Examples
///
/// ```
/// use greenlane_core::{CountryCode, VatRegistry};
///
/// let registry = VatRegistry::with_defaults().unwrap();
/// let at = CountryCode::parse("AT").unwrap();
///
/// assert!(registry.validate(&at, "ATU12345678").is_ok());
/// assert!(registry.validate(&at, "INVALIDVAT").is_err());
/// ```
#[derive(Debug)]
pub struct VatRegistry {
    rules: HashMap<CountryCode, Regex>,
}

impl VatRegistry {
    /// Create an empty registry with no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Create a registry preloaded with the default EU format rules.
    ///
    /// # Errors
    ///
    /// Returns `VatError::InvalidPattern` if a default pattern fails to
    /// compile (indicates a broken rule table).
    pub fn with_defaults() -> Result<Self, VatError> {
        let mut registry = Self::empty();
        for (country, pattern) in DEFAULT_RULES {
            let country = CountryCode::parse(country)
                .map_err(|_| VatError::InvalidCountry((*country).to_owned()))?;
            registry.register(country, pattern)?;
        }
        Ok(registry)
    }

    /// Register (or replace) the format rule for a country.
    ///
    /// The pattern is anchored to match the whole VAT id.
    ///
    /// # Errors
    ///
    /// Returns `VatError::InvalidPattern` if the pattern fails to compile.
    pub fn register(&mut self, country: CountryCode, pattern: &str) -> Result<(), VatError> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|source| VatError::InvalidPattern {
            country: country.as_str().to_owned(),
            source,
        })?;
        self.rules.insert(country, regex);
        Ok(())
    }

    /// Returns whether a rule is registered for the given country.
    #[must_use]
    pub fn has_rule(&self, country: &CountryCode) -> bool {
        self.rules.contains_key(country)
    }

    /// Validate a VAT id against the rule for the given country.
    ///
    /// Surrounding whitespace is ignored. An unknown country rejects any
    /// non-empty VAT id, since its format cannot be verified.
    ///
    /// # Errors
    ///
    /// Returns `VatError::WrongFormat` if the VAT id does not match the
    /// country's rule or the country has no rule.
    pub fn validate(&self, country: &CountryCode, vat_id: &str) -> Result<(), VatError> {
        let wrong_format = || VatError::WrongFormat {
            country: country.as_str().to_owned(),
        };

        let rule = self.rules.get(country).ok_or_else(wrong_format)?;

        if rule.is_match(vat_id.trim()) {
            Ok(())
        } else {
            Err(wrong_format())
        }
    }
}
