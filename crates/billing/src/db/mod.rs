//! Database operations for billing `PostgreSQL`.
//!
//! # Tables
//!
//! - `customer` - One row per user identity, auto-provisioned
//! - `customer_profile` - Local cache of gateway customer profiles
//! - `customer_payment_profile` - Local cache of payment sub-profiles
//! - `address` - Customer shipping/billing addresses
//! - `item`, `invoice` - Sample catalog
//!
//! # Store traits
//!
//! [`CustomerStore`] and [`ProfileStore`] seam the service layer from the
//! backing store. [`CustomerRepository`] and [`ProfileRepository`] are the
//! `PostgreSQL` implementations; [`MemoryStore`] implements both traits in
//! memory for tests and embedding.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/billing/migrations/` and run via:
//! ```bash
//! cargo run -p samplestore-cli -- migrate
//! ```

pub mod addresses;
pub mod catalog;
pub mod customers;
pub mod memory;
pub mod profiles;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use samplestore_core::{CustomerProfileId, MaskedCardNumber, PaymentProfileId, UserId};

use crate::gateway::BillingDetails;
use crate::models::{Customer, CustomerPaymentProfile, CustomerProfile};

pub use addresses::{AddressRepository, NewAddress};
pub use catalog::CatalogRepository;
pub use customers::CustomerRepository;
pub use memory::MemoryStore;
pub use profiles::ProfileRepository;

/// Embedded migrations for the billing schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate profile for a user).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Field set for inserting a payment sub-profile row.
///
/// Only persistable data can be expressed here: the billing fields and an
/// already-masked card number. There is no way to hand an expiration date
/// or card code to the store layer.
#[derive(Debug, Clone)]
pub struct NewPaymentProfile {
    /// Parent profile row.
    pub customer_profile_id: CustomerProfileId,
    /// Gateway-minted sub-profile identifier.
    pub payment_profile_id: String,
    /// Billing fields to store.
    pub billing: BillingDetails,
    /// Masked card number, if any.
    pub card_number: Option<MaskedCardNumber>,
}

/// Storage seam for customer rows.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Get or create the customer row for a user identity (idempotent
    /// upsert keyed by user).
    async fn ensure_customer(&self, user_id: UserId) -> Result<Customer, RepositoryError>;

    /// Look up the customer row for a user identity.
    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Customer>, RepositoryError>;
}

/// Storage seam for gateway-backed profile rows.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert a customer profile row with its gateway-minted identifier.
    async fn insert_profile(
        &self,
        user_id: UserId,
        remote_profile_id: &str,
    ) -> Result<CustomerProfile, RepositoryError>;

    /// Look up a profile row by its local ID.
    async fn get_profile(
        &self,
        id: CustomerProfileId,
    ) -> Result<Option<CustomerProfile>, RepositoryError>;

    /// Look up a user's profile row.
    async fn get_profile_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<CustomerProfile>, RepositoryError>;

    /// Insert a payment sub-profile row.
    async fn insert_payment_profile(
        &self,
        row: NewPaymentProfile,
    ) -> Result<CustomerPaymentProfile, RepositoryError>;

    /// Write back all mutable fields of a payment sub-profile row.
    async fn update_payment_profile(
        &self,
        row: &CustomerPaymentProfile,
    ) -> Result<(), RepositoryError>;

    /// Find a payment sub-profile by its sync key: parent profile plus
    /// gateway-minted identifier.
    async fn find_payment_profile(
        &self,
        customer_profile_id: CustomerProfileId,
        payment_profile_id: &str,
    ) -> Result<Option<CustomerPaymentProfile>, RepositoryError>;

    /// List a profile's payment sub-profile rows.
    async fn list_payment_profiles(
        &self,
        customer_profile_id: CustomerProfileId,
    ) -> Result<Vec<CustomerPaymentProfile>, RepositoryError>;

    /// Delete a payment sub-profile row.
    ///
    /// Returns `true` if the row was deleted, `false` if it didn't exist.
    async fn delete_payment_profile(
        &self,
        id: PaymentProfileId,
    ) -> Result<bool, RepositoryError>;
}
