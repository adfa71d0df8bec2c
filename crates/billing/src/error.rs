//! The caller-facing billing error.
//!
//! Every `BillingService` operation returns `Result<T, BillingError>`.
//! Callers that want to show a payment-failure message match on
//! [`BillingError::Declined`]; everything else is an infrastructure
//! failure (transport, decoding, persistence).

use thiserror::Error;

use crate::db::RepositoryError;
use crate::gateway::GatewayError;

/// Billing operation error.
#[derive(Debug, Error)]
pub enum BillingError {
    /// The gateway processed the request and reported failure.
    #[error("payment declined ({code}): {message}")]
    Declined {
        /// Gateway reason code.
        code: String,
        /// Gateway reason text.
        message: String,
    },

    /// The gateway could not be reached or returned an unusable response.
    #[error("gateway error: {0}")]
    Gateway(GatewayError),

    /// Local persistence failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<GatewayError> for BillingError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Declined { code, message } => Self::Declined { code, message },
            other => Self::Gateway(other),
        }
    }
}

/// Result type alias for `BillingError`.
pub type Result<T> = std::result::Result<T, BillingError>;
