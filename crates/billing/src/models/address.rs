//! Customer address domain type.

use samplestore_core::{AddressId, AddressKind, CustomerId};

/// A customer billing or shipping address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Billing or shipping.
    pub kind: AddressKind,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address: String,
    pub city: String,
    /// Two-letter state code.
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub fax: String,
}
