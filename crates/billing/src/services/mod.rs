//! Service layer.

mod billing;

pub use billing::{BillingService, RemoteCall};
