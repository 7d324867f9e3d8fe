//! Core types for Greenlane.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod country;
pub mod email;
pub mod gender;
pub mod id;

pub use country::{CountryCode, CountryCodeError};
pub use email::{Email, EmailError};
pub use gender::{Gender, GenderError};
pub use id::*;
