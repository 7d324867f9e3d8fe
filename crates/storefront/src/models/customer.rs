//! Customer domain types.

use chrono::{DateTime, Utc};

use greenlane_core::{CustomerId, Email, Gender};

/// A registered storefront customer (domain type).
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Customer's email address.
    pub email: Email,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Gender, if the customer has set one.
    pub gender: Option<Gender>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// When the customer registered.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Display name for templates.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.as_str().to_owned()
        } else {
            name.to_owned()
        }
    }
}

/// A partial profile update.
///
/// Only the profile attributes a customer may edit; credentials are handled
/// separately by the auth service.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    /// New first name.
    pub first_name: String,
    /// New last name.
    pub last_name: String,
    /// New gender selection, if any.
    pub gender: Option<Gender>,
    /// New phone number, if any.
    pub phone: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer(first: &str, last: &str) -> Customer {
        Customer {
            id: CustomerId::new(1),
            email: Email::parse("jane@example.com").unwrap(),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            gender: None,
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_uses_names() {
        assert_eq!(customer("Jane", "Doe").display_name(), "Jane Doe");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        assert_eq!(customer("", "").display_name(), "jane@example.com");
    }
}
