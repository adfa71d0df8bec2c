//! Billing domain types.
//!
//! These are validated domain objects, separate from database row shapes.
//! Profile types hold only data that is safe to persist: card numbers
//! appear exclusively in masked form, and expiration/card-code fields do
//! not exist here at all.

pub mod address;
pub mod catalog;
pub mod customer;
pub mod profile;

pub use address::Address;
pub use catalog::{Invoice, Item};
pub use customer::Customer;
pub use profile::{CustomerPaymentProfile, CustomerProfile};
