//! Sample Store Billing - gateway-synchronized billing records.
//!
//! This library keeps a local cache of customer billing data that lives
//! authoritatively in a remote payment gateway's Customer Information
//! Management (CIM) API.
//!
//! # Architecture
//!
//! - The gateway is source of truth for profile identifiers - local rows
//!   are created only after a successful remote call
//! - `PostgreSQL` for persistence, with store traits seaming the service
//!   layer so an in-memory store can stand in for tests and embedding
//! - Explicit, synchronous event dispatch (no global signal wiring):
//!   callers hand a [`events::BillingEvent`] to an [`events::EventBus`]
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`models`] - Domain types for customers, profiles, addresses, catalog
//! - [`db`] - Store traits, `PostgreSQL` repositories, in-memory store
//! - [`gateway`] - `PaymentGateway` trait and the reqwest-backed `CimClient`
//! - [`services`] - `BillingService` profile lifecycle operations
//! - [`events`] - Observer registry and the customer auto-provision hook
//!
//! # Example
//!
//! ```rust,ignore
//! use samplestore_billing::{
//!     db::{CustomerRepository, ProfileRepository},
//!     gateway::{BillingDetails, CimClient, PaymentDetails},
//!     services::BillingService,
//! };
//!
//! let gateway = CimClient::new(&config.gateway);
//! let service = BillingService::new(
//!     Arc::new(ProfileRepository::new(pool.clone())),
//!     Arc::new(gateway),
//! );
//!
//! let profile = service.create_profile(user_id, &payment, &billing).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod gateway;
pub mod models;
pub mod services;

pub use config::{BillingConfig, ConfigError, GatewayConfig};
pub use error::{BillingError, Result};
pub use services::BillingService;
