//! Payment gateway (CIM) client.
//!
//! The gateway stores reusable customer/payment profiles and is the source
//! of truth for their identifiers. [`PaymentGateway`] is the seam the
//! service layer depends on; [`CimClient`] is the production implementation
//! speaking JSON over HTTPS.
//!
//! Every gateway response carries a `success` discriminator. An
//! unsuccessful response surfaces as [`GatewayError::Declined`], which the
//! service layer maps to the caller-facing `BillingError`.

mod cim;
pub mod types;

pub use cim::CimClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use samplestore_core::UserId;

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway processed the request and reported failure.
    #[error("declined ({code}): {message}")]
    Declined {
        /// Gateway reason code.
        code: String,
        /// Gateway reason text.
        message: String,
    },

    /// HTTP transport or body decoding failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success HTTP status.
    #[error("unexpected gateway response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },
}

/// Operations exposed by the gateway's Customer Information Management API.
///
/// Identifiers returned here (`profile_id`, `payment_profile_id`) are
/// opaque strings minted by the gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Register a new customer profile, optionally creating payment
    /// sub-profiles from the supplied payment data in the same call.
    async fn add_profile(
        &self,
        user_id: UserId,
        payment: &PaymentDetails,
        billing: &BillingDetails,
    ) -> Result<CreatedProfile, GatewayError>;

    /// Fetch the remote state of a profile's payment sub-profiles.
    async fn get_profile(
        &self,
        profile_id: &str,
    ) -> Result<Vec<RemotePaymentProfile>, GatewayError>;

    /// Create a payment sub-profile under an existing profile, returning
    /// its gateway-minted identifier.
    async fn create_payment_profile(
        &self,
        profile_id: &str,
        payment: &PaymentDetails,
        billing: &BillingDetails,
    ) -> Result<String, GatewayError>;

    /// Replace the payment and billing data of an existing sub-profile.
    async fn update_payment_profile(
        &self,
        profile_id: &str,
        payment_profile_id: &str,
        payment: &PaymentDetails,
        billing: &BillingDetails,
    ) -> Result<(), GatewayError>;

    /// Remove a payment sub-profile from the gateway.
    async fn delete_payment_profile(
        &self,
        profile_id: &str,
        payment_profile_id: &str,
    ) -> Result<(), GatewayError>;
}
