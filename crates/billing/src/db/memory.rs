//! In-memory store.
//!
//! Implements [`CustomerStore`] and [`ProfileStore`] over
//! `Arc<RwLock<..>>` state. Useful for tests and for embedding the
//! billing service without a database; behavior matches the `PostgreSQL`
//! repositories, including the uniqueness constraints.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use samplestore_core::{CustomerId, CustomerProfileId, PaymentProfileId, UserId};

use super::{CustomerStore, NewPaymentProfile, ProfileStore, RepositoryError};
use crate::models::{Customer, CustomerPaymentProfile, CustomerProfile};

/// A thread-safe in-memory store for billing rows.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    customers: HashMap<i32, Customer>,
    profiles: HashMap<i32, CustomerProfile>,
    payment_profiles: HashMap<i32, CustomerPaymentProfile>,
    next_id: i32,
}

impl Inner {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    /// Creates a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of customer rows.
    pub async fn customer_count(&self) -> usize {
        self.inner.read().await.customers.len()
    }

    /// Number of customer profile rows.
    pub async fn profile_count(&self) -> usize {
        self.inner.read().await.profiles.len()
    }

    /// Number of payment sub-profile rows.
    pub async fn payment_profile_count(&self) -> usize {
        self.inner.read().await.payment_profiles.len()
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn ensure_customer(&self, user_id: UserId) -> Result<Customer, RepositoryError> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner
            .customers
            .values()
            .find(|c| c.user_id == user_id)
            .cloned()
        {
            return Ok(existing);
        }

        let id = inner.allocate_id();
        let customer = Customer {
            id: CustomerId::new(id),
            user_id,
            shipping_same_as_billing: true,
            created_at: Utc::now(),
        };
        inner.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Customer>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .customers
            .values()
            .find(|c| c.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn insert_profile(
        &self,
        user_id: UserId,
        remote_profile_id: &str,
    ) -> Result<CustomerProfile, RepositoryError> {
        let mut inner = self.inner.write().await;

        if inner.profiles.values().any(|p| p.user_id == user_id) {
            return Err(RepositoryError::Conflict(
                "user already has a profile".to_owned(),
            ));
        }

        let id = inner.allocate_id();
        let profile = CustomerProfile {
            id: CustomerProfileId::new(id),
            user_id,
            profile_id: remote_profile_id.to_owned(),
            created_at: Utc::now(),
        };
        inner.profiles.insert(id, profile.clone());
        Ok(profile)
    }

    async fn get_profile(
        &self,
        id: CustomerProfileId,
    ) -> Result<Option<CustomerProfile>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.get(&id.as_i32()).cloned())
    }

    async fn get_profile_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<CustomerProfile>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .profiles
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn insert_payment_profile(
        &self,
        row: NewPaymentProfile,
    ) -> Result<CustomerPaymentProfile, RepositoryError> {
        let mut inner = self.inner.write().await;

        let duplicate = inner.payment_profiles.values().any(|p| {
            p.customer_profile_id == row.customer_profile_id
                && p.payment_profile_id == row.payment_profile_id
        });
        if duplicate {
            return Err(RepositoryError::Conflict(
                "payment profile already exists for this profile".to_owned(),
            ));
        }

        let id = inner.allocate_id();
        let now = Utc::now();
        let profile = CustomerPaymentProfile {
            id: PaymentProfileId::new(id),
            customer_profile_id: row.customer_profile_id,
            first_name: row.billing.first_name,
            last_name: row.billing.last_name,
            company: row.billing.company,
            address: row.billing.address,
            city: row.billing.city,
            state: row.billing.state,
            zip: row.billing.zip,
            country: row.billing.country,
            phone: row.billing.phone,
            fax: row.billing.fax,
            payment_profile_id: row.payment_profile_id,
            card_number: row.card_number,
            created_at: now,
            updated_at: now,
        };
        inner.payment_profiles.insert(id, profile.clone());
        Ok(profile)
    }

    async fn update_payment_profile(
        &self,
        row: &CustomerPaymentProfile,
    ) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;

        if !inner.payment_profiles.contains_key(&row.id.as_i32()) {
            return Err(RepositoryError::NotFound);
        }

        let mut updated = row.clone();
        updated.updated_at = Utc::now();
        inner.payment_profiles.insert(row.id.as_i32(), updated);
        Ok(())
    }

    async fn find_payment_profile(
        &self,
        customer_profile_id: CustomerProfileId,
        payment_profile_id: &str,
    ) -> Result<Option<CustomerPaymentProfile>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .payment_profiles
            .values()
            .find(|p| {
                p.customer_profile_id == customer_profile_id
                    && p.payment_profile_id == payment_profile_id
            })
            .cloned())
    }

    async fn list_payment_profiles(
        &self,
        customer_profile_id: CustomerProfileId,
    ) -> Result<Vec<CustomerPaymentProfile>, RepositoryError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<_> = inner
            .payment_profiles
            .values()
            .filter(|p| p.customer_profile_id == customer_profile_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.id.as_i32());
        Ok(rows)
    }

    async fn delete_payment_profile(
        &self,
        id: PaymentProfileId,
    ) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        Ok(inner.payment_profiles.remove(&id.as_i32()).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gateway::BillingDetails;

    fn new_payment_profile(
        customer_profile_id: CustomerProfileId,
        payment_profile_id: &str,
    ) -> NewPaymentProfile {
        NewPaymentProfile {
            customer_profile_id,
            payment_profile_id: payment_profile_id.to_owned(),
            billing: BillingDetails::default(),
            card_number: None,
        }
    }

    #[tokio::test]
    async fn test_ensure_customer_is_idempotent() {
        let store = MemoryStore::new();

        let first = store.ensure_customer(UserId::new(1)).await.unwrap();
        let second = store.ensure_customer(UserId::new(1)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.customer_count().await, 1);
    }

    #[tokio::test]
    async fn test_insert_profile_rejects_second_profile_for_user() {
        let store = MemoryStore::new();

        store.insert_profile(UserId::new(1), "100").await.unwrap();
        let err = store.insert_profile(UserId::new(1), "101").await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.profile_count().await, 1);
    }

    #[tokio::test]
    async fn test_find_payment_profile_by_sync_key() {
        let store = MemoryStore::new();
        let profile = store.insert_profile(UserId::new(1), "100").await.unwrap();

        store
            .insert_payment_profile(new_payment_profile(profile.id, "200"))
            .await
            .unwrap();

        let found = store
            .find_payment_profile(profile.id, "200")
            .await
            .unwrap();
        assert!(found.is_some());

        let missing = store
            .find_payment_profile(profile.id, "999")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_insert_payment_profile_rejects_duplicate_sync_key() {
        let store = MemoryStore::new();
        let profile = store.insert_profile(UserId::new(1), "100").await.unwrap();

        store
            .insert_payment_profile(new_payment_profile(profile.id, "200"))
            .await
            .unwrap();
        let err = store
            .insert_payment_profile(new_payment_profile(profile.id, "200"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_payment_profile() {
        let store = MemoryStore::new();
        let profile = store.insert_profile(UserId::new(1), "100").await.unwrap();
        let row = store
            .insert_payment_profile(new_payment_profile(profile.id, "200"))
            .await
            .unwrap();

        assert!(store.delete_payment_profile(row.id).await.unwrap());
        assert!(!store.delete_payment_profile(row.id).await.unwrap());
        assert_eq!(store.payment_profile_count().await, 0);
    }
}
