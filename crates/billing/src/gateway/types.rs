//! Structured gateway parameter and payload types.
//!
//! These replace loose key/value dictionaries with named, compile-time
//! checked fields. [`PaymentDetails`] carries the sensitive card data for
//! the duration of a gateway call and cannot be serialized or persisted
//! as a whole: the card code lives in a `SecretString` and the card
//! number's only storable form is its mask.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use samplestore_core::{CardNumber, MaskedCardNumber};

/// Payment instrument data for gateway calls.
///
/// Expiration and card code never reach the store layer; the card number
/// is persisted only as `XXXX` + last-4.
#[derive(Debug, Clone)]
pub struct PaymentDetails {
    /// Full card number, wire-only.
    pub card_number: CardNumber,
    /// Expiration in `YYYY-MM` form, wire-only.
    pub expiration: String,
    /// Card verification code, wire-only.
    pub card_code: SecretString,
}

impl PaymentDetails {
    /// Create payment details for a gateway call.
    #[must_use]
    pub fn new(card_number: CardNumber, expiration: impl Into<String>, card_code: &str) -> Self {
        Self {
            card_number,
            expiration: expiration.into(),
            card_code: SecretString::from(card_code.to_owned()),
        }
    }
}

/// Billing identity and address data for gateway calls.
///
/// All fields are optional at the gateway; empty strings mean "not
/// provided", matching the stored representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub fax: String,
}

/// Result of a successful `add_profile` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedProfile {
    /// Gateway-minted profile identifier.
    pub profile_id: String,
    /// Identifiers of payment sub-profiles created as part of the call.
    pub payment_profile_ids: Vec<String>,
}

/// Remote billing fields as returned by `get_profile`.
///
/// Fields absent from the payload are `None` and must leave the local
/// value untouched during sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteBilling {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
}

/// Remote credit-card fields as returned by `get_profile`.
///
/// The gateway only ever returns the masked form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCard {
    /// Masked card number (`XXXX` + last 4).
    pub card_number: MaskedCardNumber,
}

/// One payment sub-profile as returned by `get_profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePaymentProfile {
    /// Gateway-minted sub-profile identifier.
    pub payment_profile_id: String,
    /// Billing fields present in the remote payload.
    #[serde(default)]
    pub billing: RemoteBilling,
    /// Stored card, if the sub-profile has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<RemoteCard>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_payment_profile_deserializes_partial_payload() {
        let json = r#"{
            "payment_profile_id": "301",
            "billing": { "address": "12 Main St", "zip": "60614" }
        }"#;

        let remote: RemotePaymentProfile = serde_json::from_str(json).unwrap();
        assert_eq!(remote.payment_profile_id, "301");
        assert_eq!(remote.billing.address.as_deref(), Some("12 Main St"));
        assert_eq!(remote.billing.first_name, None);
        assert!(remote.credit_card.is_none());
    }

    #[test]
    fn test_billing_details_defaults_missing_fields() {
        let billing: BillingDetails =
            serde_json::from_str(r#"{ "first_name": "Ada" }"#).unwrap();
        assert_eq!(billing.first_name, "Ada");
        assert_eq!(billing.city, "");
    }
}
