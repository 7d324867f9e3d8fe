//! Customer address domain types.

use chrono::{DateTime, Utc};

use greenlane_core::{AddressId, CountryCode, CustomerId};

/// A customer's postal address (domain type).
///
/// Belongs to exactly one customer. A persisted address either has no VAT
/// id or one that passed the format gate for its country.
#[derive(Debug, Clone)]
pub struct CustomerAddress {
    /// Unique address ID.
    pub id: AddressId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Company name (optional, empty string when not set).
    pub company_name: String,
    /// Recipient first name.
    pub first_name: String,
    /// Recipient last name.
    pub last_name: String,
    /// VAT identifier, if provided.
    pub vat_id: Option<String>,
    /// Street address lines, newline-joined.
    pub address1: String,
    /// Country code.
    pub country: CountryCode,
    /// State or region.
    pub state: String,
    /// City.
    pub city: String,
    /// Postal code.
    pub postcode: String,
    /// Contact phone number.
    pub phone: String,
    /// Whether this is the customer's default address.
    pub is_default: bool,
    /// When the address was created.
    pub created_at: DateTime<Utc>,
    /// When the address was last updated.
    pub updated_at: DateTime<Utc>,
}

impl CustomerAddress {
    /// Street address lines as submitted on the form.
    #[must_use]
    pub fn address1_lines(&self) -> Vec<String> {
        self.address1.lines().map(str::to_owned).collect()
    }
}

/// Validated field values for creating or overwriting an address.
///
/// Produced by the address form handler after the VAT gate has passed.
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub company_name: String,
    pub first_name: String,
    pub last_name: String,
    pub vat_id: Option<String>,
    /// Street address lines, newline-joined.
    pub address1: String,
    pub country: CountryCode,
    pub state: String,
    pub city: String,
    pub postcode: String,
    pub phone: String,
}
