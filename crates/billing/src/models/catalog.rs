//! Catalog and invoice domain types.

use chrono::{DateTime, Utc};

use samplestore_core::{CustomerId, InvoiceId, ItemId, Price};

/// A purchasable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Unique item ID.
    pub id: ItemId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
}

/// An invoice linking a customer to a purchased item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    /// Unique invoice ID.
    pub id: InvoiceId,
    /// Billed customer.
    pub customer_id: CustomerId,
    /// Purchased item.
    pub item_id: ItemId,
    /// When the invoice was created.
    pub created_at: DateTime<Utc>,
}
