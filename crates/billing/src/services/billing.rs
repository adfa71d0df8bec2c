//! Billing service.
//!
//! Owns the profile lifecycle: two-phase creation (gateway first, local
//! persistence only on success), sync from remote state, update, and
//! conditional delete. The gateway is always called before any local
//! write; a decline leaves the store untouched.

use std::sync::Arc;

use samplestore_core::UserId;

use crate::db::{NewPaymentProfile, ProfileStore};
use crate::error::Result;
use crate::gateway::{BillingDetails, PaymentDetails, PaymentGateway, RemotePaymentProfile};
use crate::models::{CustomerPaymentProfile, CustomerProfile};

/// Whether a payment sub-profile creation should call the gateway.
///
/// `Skip` is used when the sub-profile was already minted remotely as a
/// side effect of profile creation; the caller supplies the identifier
/// the gateway returned.
#[derive(Debug, Clone)]
pub enum RemoteCall {
    /// Call the gateway to create the sub-profile.
    Perform,
    /// The sub-profile already exists remotely under this identifier.
    Skip {
        /// Gateway-minted sub-profile identifier.
        payment_profile_id: String,
    },
}

/// Billing profile lifecycle service.
pub struct BillingService {
    profiles: Arc<dyn ProfileStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl BillingService {
    /// Create a new billing service.
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { profiles, gateway }
    }

    /// Register a customer profile with the gateway and cache it locally.
    ///
    /// Two-phase write: the gateway call comes first and is the source of
    /// truth for identifiers. Sub-profiles minted as part of the gateway
    /// call are persisted with [`RemoteCall::Skip`] - no redundant remote
    /// calls are made for them.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Declined` on a gateway decline, in which
    /// case nothing was written locally.
    pub async fn create_profile(
        &self,
        user_id: UserId,
        payment: &PaymentDetails,
        billing: &BillingDetails,
    ) -> Result<CustomerProfile> {
        let created = self.gateway.add_profile(user_id, payment, billing).await?;

        let profile = self
            .profiles
            .insert_profile(user_id, &created.profile_id)
            .await?;

        tracing::info!(
            %user_id,
            profile_id = %profile.profile_id,
            sub_profiles = created.payment_profile_ids.len(),
            "customer profile created"
        );

        for payment_profile_id in created.payment_profile_ids {
            self.create_payment_profile(
                &profile,
                payment,
                billing,
                RemoteCall::Skip { payment_profile_id },
            )
            .await?;
        }

        Ok(profile)
    }

    /// Create a payment sub-profile under an existing profile.
    ///
    /// Expiration date and card code are dropped before persistence and
    /// the card number is stored in masked form only.
    ///
    /// # Errors
    ///
    /// With [`RemoteCall::Perform`], returns `BillingError::Declined` on a
    /// gateway decline and writes nothing locally.
    pub async fn create_payment_profile(
        &self,
        profile: &CustomerProfile,
        payment: &PaymentDetails,
        billing: &BillingDetails,
        remote: RemoteCall,
    ) -> Result<CustomerPaymentProfile> {
        let payment_profile_id = match remote {
            RemoteCall::Perform => {
                self.gateway
                    .create_payment_profile(&profile.profile_id, payment, billing)
                    .await?
            }
            RemoteCall::Skip { payment_profile_id } => payment_profile_id,
        };

        let row = self
            .profiles
            .insert_payment_profile(NewPaymentProfile {
                customer_profile_id: profile.id,
                payment_profile_id,
                billing: billing.clone(),
                card_number: Some(payment.card_number.mask()),
            })
            .await?;

        tracing::info!(
            profile_id = %profile.profile_id,
            payment_profile_id = %row.payment_profile_id,
            "payment profile stored"
        );

        Ok(row)
    }

    /// Overwrite local profile state with remote state.
    ///
    /// Each remote sub-profile is matched to a local row by
    /// (profile, remote identifier); missing rows are created. Returns the
    /// synced rows.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Declined` if the gateway refuses the fetch.
    pub async fn sync_profile(
        &self,
        profile: &CustomerProfile,
    ) -> Result<Vec<CustomerPaymentProfile>> {
        let remote_profiles = self.gateway.get_profile(&profile.profile_id).await?;

        tracing::info!(
            profile_id = %profile.profile_id,
            remote_count = remote_profiles.len(),
            "syncing profile from gateway"
        );

        let mut synced = Vec::with_capacity(remote_profiles.len());
        for remote in &remote_profiles {
            let mut row = match self
                .profiles
                .find_payment_profile(profile.id, &remote.payment_profile_id)
                .await?
            {
                Some(row) => row,
                None => {
                    self.profiles
                        .insert_payment_profile(NewPaymentProfile {
                            customer_profile_id: profile.id,
                            payment_profile_id: remote.payment_profile_id.clone(),
                            billing: BillingDetails::default(),
                            card_number: None,
                        })
                        .await?
                }
            };
            self.sync_payment_profile(&mut row, remote).await?;
            synced.push(row);
        }

        Ok(synced)
    }

    /// Overwrite one local sub-profile row from a remote payload.
    ///
    /// Only fields present in the payload are written.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Repository` if the write-back fails.
    pub async fn sync_payment_profile(
        &self,
        row: &mut CustomerPaymentProfile,
        remote: &RemotePaymentProfile,
    ) -> Result<()> {
        row.apply_remote(remote);
        self.profiles.update_payment_profile(row).await?;
        Ok(())
    }

    /// Update a payment sub-profile remotely, then mirror the new data
    /// locally (masked card only, no expiration/card code).
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Declined` on a gateway decline; local fields
    /// are left unchanged in that case.
    pub async fn update_payment_profile(
        &self,
        profile: &CustomerProfile,
        row: &mut CustomerPaymentProfile,
        payment: &PaymentDetails,
        billing: &BillingDetails,
    ) -> Result<()> {
        self.gateway
            .update_payment_profile(
                &profile.profile_id,
                &row.payment_profile_id,
                payment,
                billing,
            )
            .await?;

        row.apply_update(billing, payment.card_number.mask());
        self.profiles.update_payment_profile(row).await?;

        tracing::info!(
            profile_id = %profile.profile_id,
            payment_profile_id = %row.payment_profile_id,
            "payment profile updated"
        );

        Ok(())
    }

    /// Delete a payment sub-profile remotely, then locally.
    ///
    /// The local row is removed only after the gateway confirmed the
    /// remote delete; a decline leaves it in place.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::Declined` on a gateway decline.
    pub async fn delete_payment_profile(
        &self,
        profile: &CustomerProfile,
        row: &CustomerPaymentProfile,
    ) -> Result<()> {
        self.gateway
            .delete_payment_profile(&profile.profile_id, &row.payment_profile_id)
            .await?;

        self.profiles.delete_payment_profile(row.id).await?;

        tracing::info!(
            profile_id = %profile.profile_id,
            payment_profile_id = %row.payment_profile_id,
            "payment profile deleted"
        );

        Ok(())
    }
}
