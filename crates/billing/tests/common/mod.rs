//! Shared test support: a scripted gateway and request fixtures.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use samplestore_billing::gateway::{
    BillingDetails, CreatedProfile, GatewayError, PaymentDetails, PaymentGateway,
    RemotePaymentProfile,
};
use samplestore_core::UserId;

/// A record of one gateway invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    AddProfile {
        user_id: i32,
    },
    GetProfile {
        profile_id: String,
    },
    CreatePaymentProfile {
        profile_id: String,
    },
    UpdatePaymentProfile {
        profile_id: String,
        payment_profile_id: String,
    },
    DeletePaymentProfile {
        profile_id: String,
        payment_profile_id: String,
    },
}

/// Scripted in-process gateway.
///
/// Records every call; either approves with the configured payloads or
/// declines everything.
pub struct MockGateway {
    decline: bool,
    payment_profile_ids: Vec<String>,
    remote_profiles: Vec<RemotePaymentProfile>,
    next_payment_profile_id: AtomicUsize,
    calls: Mutex<Vec<GatewayCall>>,
}

impl MockGateway {
    /// A gateway that approves every request.
    pub fn approving() -> Self {
        Self {
            decline: false,
            payment_profile_ids: Vec::new(),
            remote_profiles: Vec::new(),
            next_payment_profile_id: AtomicUsize::new(500),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A gateway that declines every request.
    pub fn declining() -> Self {
        Self {
            decline: true,
            ..Self::approving()
        }
    }

    /// Sub-profile identifiers returned from `add_profile`.
    pub fn with_payment_profile_ids(mut self, ids: &[&str]) -> Self {
        self.payment_profile_ids = ids.iter().map(ToString::to_string).collect();
        self
    }

    /// Remote state returned from `get_profile`.
    pub fn with_remote_profiles(mut self, profiles: Vec<RemotePaymentProfile>) -> Self {
        self.remote_profiles = profiles;
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().expect("calls lock poisoned").push(call);
    }

    fn check_decline(&self) -> Result<(), GatewayError> {
        if self.decline {
            return Err(GatewayError::Declined {
                code: "E00027".to_string(),
                message: "The transaction was unsuccessful.".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn add_profile(
        &self,
        user_id: UserId,
        _payment: &PaymentDetails,
        _billing: &BillingDetails,
    ) -> Result<CreatedProfile, GatewayError> {
        self.record(GatewayCall::AddProfile {
            user_id: user_id.as_i32(),
        });
        self.check_decline()?;
        Ok(CreatedProfile {
            profile_id: "100".to_string(),
            payment_profile_ids: self.payment_profile_ids.clone(),
        })
    }

    async fn get_profile(
        &self,
        profile_id: &str,
    ) -> Result<Vec<RemotePaymentProfile>, GatewayError> {
        self.record(GatewayCall::GetProfile {
            profile_id: profile_id.to_string(),
        });
        self.check_decline()?;
        Ok(self.remote_profiles.clone())
    }

    async fn create_payment_profile(
        &self,
        profile_id: &str,
        _payment: &PaymentDetails,
        _billing: &BillingDetails,
    ) -> Result<String, GatewayError> {
        self.record(GatewayCall::CreatePaymentProfile {
            profile_id: profile_id.to_string(),
        });
        self.check_decline()?;
        let id = self.next_payment_profile_id.fetch_add(1, Ordering::SeqCst);
        Ok(id.to_string())
    }

    async fn update_payment_profile(
        &self,
        profile_id: &str,
        payment_profile_id: &str,
        _payment: &PaymentDetails,
        _billing: &BillingDetails,
    ) -> Result<(), GatewayError> {
        self.record(GatewayCall::UpdatePaymentProfile {
            profile_id: profile_id.to_string(),
            payment_profile_id: payment_profile_id.to_string(),
        });
        self.check_decline()
    }

    async fn delete_payment_profile(
        &self,
        profile_id: &str,
        payment_profile_id: &str,
    ) -> Result<(), GatewayError> {
        self.record(GatewayCall::DeletePaymentProfile {
            profile_id: profile_id.to_string(),
            payment_profile_id: payment_profile_id.to_string(),
        });
        self.check_decline()
    }
}

/// A Visa test card.
pub fn visa() -> PaymentDetails {
    PaymentDetails::new(
        "4111111111111111".parse().expect("valid test card"),
        "2027-11",
        "123",
    )
}

/// A Mastercard test card.
pub fn mastercard() -> PaymentDetails {
    PaymentDetails::new(
        "5424000000000015".parse().expect("valid test card"),
        "2028-02",
        "900",
    )
}

/// A filled-in billing fixture.
pub fn ada_billing() -> BillingDetails {
    BillingDetails {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address: "1 Analytical Way".to_string(),
        city: "London".to_string(),
        zip: "N1 9GU".to_string(),
        country: "GB".to_string(),
        ..BillingDetails::default()
    }
}
