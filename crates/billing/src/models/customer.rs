//! Customer domain type.

use chrono::{DateTime, Utc};

use samplestore_core::{CustomerId, UserId};

/// A store customer.
///
/// One row exists per user identity; rows are provisioned automatically
/// when a `UserCreated` event is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Owning user identity (managed by the host application).
    pub user_id: UserId,
    /// Whether the shipping address mirrors the billing address.
    pub shipping_same_as_billing: bool,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
}
