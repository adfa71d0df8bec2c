//! Core types for Sample Store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod card;
pub mod id;
pub mod price;

pub use address::AddressKind;
pub use card::{CardError, CardNumber, MaskedCardNumber};
pub use id::*;
pub use price::{CurrencyCode, Price};
