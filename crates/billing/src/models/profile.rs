//! Gateway-backed profile domain types.
//!
//! A [`CustomerProfile`] mirrors one gateway customer profile; its
//! [`CustomerPaymentProfile`] children mirror the gateway's payment
//! sub-profiles. Local rows are a cache of remote state: they are created
//! only after a successful gateway call and refreshed by sync.

use chrono::{DateTime, Utc};

use samplestore_core::{CustomerProfileId, MaskedCardNumber, PaymentProfileId, UserId};

use crate::gateway::{BillingDetails, RemotePaymentProfile};

/// A gateway customer profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    /// Local row ID.
    pub id: CustomerProfileId,
    /// Owning user identity (one profile per user).
    pub user_id: UserId,
    /// Gateway-minted profile identifier.
    pub profile_id: String,
    /// When the local row was created.
    pub created_at: DateTime<Utc>,
}

/// A gateway payment sub-profile.
///
/// Billing fields default to empty strings ("not provided"). The card is
/// stored in masked form only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerPaymentProfile {
    /// Local row ID.
    pub id: PaymentProfileId,
    /// Parent profile row.
    pub customer_profile_id: CustomerProfileId,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub fax: String,
    /// Gateway-minted sub-profile identifier.
    pub payment_profile_id: String,
    /// Masked card number, if the sub-profile has a stored card.
    pub card_number: Option<MaskedCardNumber>,
    /// When the local row was created.
    pub created_at: DateTime<Utc>,
    /// When the local row was last written.
    pub updated_at: DateTime<Utc>,
}

impl CustomerPaymentProfile {
    /// Return the stored billing fields, suitable for pre-filling payment
    /// and billing forms.
    #[must_use]
    pub fn billing_details(&self) -> BillingDetails {
        BillingDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            company: self.company.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip: self.zip.clone(),
            country: self.country.clone(),
            phone: self.phone.clone(),
            fax: self.fax.clone(),
        }
    }

    /// Overwrite local fields from a remote payload.
    ///
    /// Only fields present in the payload are written; absent fields keep
    /// their prior values.
    pub fn apply_remote(&mut self, remote: &RemotePaymentProfile) {
        let billing = &remote.billing;
        if let Some(v) = &billing.first_name {
            self.first_name = v.clone();
        }
        if let Some(v) = &billing.last_name {
            self.last_name = v.clone();
        }
        if let Some(v) = &billing.company {
            self.company = v.clone();
        }
        if let Some(v) = &billing.address {
            self.address = v.clone();
        }
        if let Some(v) = &billing.city {
            self.city = v.clone();
        }
        if let Some(v) = &billing.state {
            self.state = v.clone();
        }
        if let Some(v) = &billing.zip {
            self.zip = v.clone();
        }
        if let Some(v) = &billing.country {
            self.country = v.clone();
        }
        if let Some(v) = &billing.phone {
            self.phone = v.clone();
        }
        if let Some(v) = &billing.fax {
            self.fax = v.clone();
        }
        if let Some(card) = &remote.credit_card {
            self.card_number = Some(card.card_number.clone());
        }
    }

    /// Overwrite local fields after a successful gateway update.
    ///
    /// Takes the masked card directly: expiration and card code have no
    /// representation here and are discarded at the type level.
    pub fn apply_update(&mut self, billing: &BillingDetails, card_number: MaskedCardNumber) {
        self.first_name = billing.first_name.clone();
        self.last_name = billing.last_name.clone();
        self.company = billing.company.clone();
        self.address = billing.address.clone();
        self.city = billing.city.clone();
        self.state = billing.state.clone();
        self.zip = billing.zip.clone();
        self.country = billing.country.clone();
        self.phone = billing.phone.clone();
        self.fax = billing.fax.clone();
        self.card_number = Some(card_number);
    }
}
