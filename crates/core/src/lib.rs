//! Greenlane Core - Shared types library.
//!
//! This crate provides common types used across all Greenlane components:
//! - `storefront` - Public-facing customer account service
//! - `integration-tests` - End-to-end test harness
//!
//! # Architecture
//!
//! The core crate contains only types and pure validation logic - no I/O,
//! no database access, no HTTP clients. This keeps it lightweight and
//! allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, genders, and
//!   country codes
//! - [`vat`] - Pluggable per-country VAT identifier format validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod vat;

pub use types::*;
pub use vat::{VatError, VatRegistry};
