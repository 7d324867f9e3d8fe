//! Domain models for the storefront.
//!
//! These types represent validated domain objects separate from database
//! row types. Conversion from rows happens in the repository layer.

pub mod address;
pub mod customer;
pub mod session;

pub use address::{CustomerAddress, NewAddress};
pub use customer::{Customer, ProfileUpdate};
pub use session::{CurrentCustomer, keys as session_keys};
