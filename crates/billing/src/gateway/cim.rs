//! Reqwest-backed CIM API client.
//!
//! Speaks a small JSON protocol against the configured gateway endpoint:
//!
//! - `POST   {endpoint}/profiles`
//! - `GET    {endpoint}/profiles/{profile_id}`
//! - `POST   {endpoint}/profiles/{profile_id}/payment-profiles`
//! - `PUT    {endpoint}/profiles/{profile_id}/payment-profiles/{id}`
//! - `DELETE {endpoint}/profiles/{profile_id}/payment-profiles/{id}`
//!
//! Requests authenticate with HTTP basic auth (API login id / transaction
//! key). Every response body carries a `success` flag plus an optional
//! reason code and message; `success: false` maps to
//! [`GatewayError::Declined`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use samplestore_core::UserId;

use crate::config::GatewayConfig;
use crate::gateway::{
    BillingDetails, CreatedProfile, GatewayError, PaymentDetails, PaymentGateway,
    RemotePaymentProfile,
};

// ─────────────────────────────────────────────────────────────────────────────
// Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct PaymentPayload<'a> {
    card_number: &'a str,
    expiration_date: &'a str,
    card_code: &'a str,
}

impl<'a> PaymentPayload<'a> {
    fn from_details(payment: &'a PaymentDetails) -> Self {
        Self {
            card_number: payment.card_number.as_str(),
            expiration_date: &payment.expiration,
            card_code: payment.card_code.expose_secret(),
        }
    }
}

#[derive(Serialize)]
struct AddProfileRequest<'a> {
    merchant_customer_id: i32,
    payment: PaymentPayload<'a>,
    billing: &'a BillingDetails,
}

#[derive(Serialize)]
struct PaymentProfileRequest<'a> {
    payment: PaymentPayload<'a>,
    billing: &'a BillingDetails,
}

/// Success discriminator shared by every response body.
#[derive(Debug, Deserialize)]
struct ResponseStatus {
    success: bool,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ResponseStatus {
    fn ensure_success(self) -> Result<(), GatewayError> {
        if self.success {
            return Ok(());
        }
        Err(GatewayError::Declined {
            code: self.code.unwrap_or_else(|| "E00001".to_string()),
            message: self
                .message
                .unwrap_or_else(|| "The gateway reported an unsuccessful response.".to_string()),
        })
    }
}

#[derive(Deserialize)]
struct AddProfileResponse {
    #[serde(flatten)]
    status: ResponseStatus,
    #[serde(default)]
    profile_id: String,
    #[serde(default)]
    payment_profile_ids: Vec<String>,
}

#[derive(Deserialize)]
struct GetProfileResponse {
    #[serde(flatten)]
    status: ResponseStatus,
    #[serde(default)]
    payment_profiles: Vec<RemotePaymentProfile>,
}

#[derive(Deserialize)]
struct CreatePaymentProfileResponse {
    #[serde(flatten)]
    status: ResponseStatus,
    #[serde(default)]
    payment_profile_id: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    #[serde(flatten)]
    status: ResponseStatus,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the payment gateway's CIM API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct CimClient {
    inner: Arc<CimClientInner>,
}

struct CimClientInner {
    http: reqwest::Client,
    endpoint: String,
    api_login_id: String,
    transaction_key: String,
    timeout: Duration,
}

impl CimClient {
    /// Create a new CIM API client.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            inner: Arc::new(CimClientInner {
                http: reqwest::Client::new(),
                endpoint: config.endpoint.as_str().trim_end_matches('/').to_string(),
                api_login_id: config.api_login_id.clone(),
                transaction_key: config.transaction_key.expose_secret().to_string(),
                timeout: config.timeout,
            }),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.inner.endpoint);
        self.inner
            .http
            .request(method, url)
            .basic_auth(&self.inner.api_login_id, Some(&self.inner.transaction_key))
            .timeout(self.inner.timeout)
    }

    /// Send a request and decode the JSON response body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::UnexpectedStatus { status, body });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PaymentGateway for CimClient {
    async fn add_profile(
        &self,
        user_id: UserId,
        payment: &PaymentDetails,
        billing: &BillingDetails,
    ) -> Result<CreatedProfile, GatewayError> {
        tracing::debug!(%user_id, "registering customer profile with gateway");

        let body = AddProfileRequest {
            merchant_customer_id: user_id.as_i32(),
            payment: PaymentPayload::from_details(payment),
            billing,
        };
        let response: AddProfileResponse = self
            .execute(self.request(Method::POST, "/profiles").json(&body))
            .await?;

        response.status.ensure_success()?;
        Ok(CreatedProfile {
            profile_id: response.profile_id,
            payment_profile_ids: response.payment_profile_ids,
        })
    }

    async fn get_profile(
        &self,
        profile_id: &str,
    ) -> Result<Vec<RemotePaymentProfile>, GatewayError> {
        tracing::debug!(profile_id, "fetching remote profile state");

        let response: GetProfileResponse = self
            .execute(self.request(Method::GET, &format!("/profiles/{profile_id}")))
            .await?;

        response.status.ensure_success()?;
        Ok(response.payment_profiles)
    }

    async fn create_payment_profile(
        &self,
        profile_id: &str,
        payment: &PaymentDetails,
        billing: &BillingDetails,
    ) -> Result<String, GatewayError> {
        tracing::debug!(profile_id, "creating payment profile with gateway");

        let body = PaymentProfileRequest {
            payment: PaymentPayload::from_details(payment),
            billing,
        };
        let response: CreatePaymentProfileResponse = self
            .execute(
                self.request(
                    Method::POST,
                    &format!("/profiles/{profile_id}/payment-profiles"),
                )
                .json(&body),
            )
            .await?;

        response.status.ensure_success()?;
        Ok(response.payment_profile_id)
    }

    async fn update_payment_profile(
        &self,
        profile_id: &str,
        payment_profile_id: &str,
        payment: &PaymentDetails,
        billing: &BillingDetails,
    ) -> Result<(), GatewayError> {
        tracing::debug!(
            profile_id,
            payment_profile_id,
            "updating payment profile with gateway"
        );

        let body = PaymentProfileRequest {
            payment: PaymentPayload::from_details(payment),
            billing,
        };
        let response: StatusResponse = self
            .execute(
                self.request(
                    Method::PUT,
                    &format!("/profiles/{profile_id}/payment-profiles/{payment_profile_id}"),
                )
                .json(&body),
            )
            .await?;

        response.status.ensure_success()
    }

    async fn delete_payment_profile(
        &self,
        profile_id: &str,
        payment_profile_id: &str,
    ) -> Result<(), GatewayError> {
        tracing::debug!(
            profile_id,
            payment_profile_id,
            "deleting payment profile from gateway"
        );

        let response: StatusResponse = self
            .execute(self.request(
                Method::DELETE,
                &format!("/profiles/{profile_id}/payment-profiles/{payment_profile_id}"),
            ))
            .await?;

        response.status.ensure_success()
    }
}
