//! Profile repository for database operations.
//!
//! Stores the local cache of gateway customer profiles and payment
//! sub-profiles. Rows here are written only after successful gateway
//! calls; the sync key for sub-profiles is
//! `(customer_profile_id, payment_profile_id)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

use samplestore_core::{CustomerProfileId, MaskedCardNumber, PaymentProfileId, UserId};

use super::{NewPaymentProfile, ProfileStore, RepositoryError};
use crate::models::{CustomerPaymentProfile, CustomerProfile};

/// Repository for profile and payment sub-profile database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn profile_from_row(row: &PgRow) -> Result<CustomerProfile, RepositoryError> {
    Ok(CustomerProfile {
        id: row.try_get::<CustomerProfileId, _>("id")?,
        user_id: row.try_get::<UserId, _>("user_id")?,
        profile_id: row.try_get("profile_id")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn payment_profile_from_row(row: &PgRow) -> Result<CustomerPaymentProfile, RepositoryError> {
    Ok(CustomerPaymentProfile {
        id: row.try_get::<PaymentProfileId, _>("id")?,
        customer_profile_id: row.try_get::<CustomerProfileId, _>("customer_profile_id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        company: row.try_get("company")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        zip: row.try_get("zip")?,
        country: row.try_get("country")?,
        phone: row.try_get("phone")?,
        fax: row.try_get("fax")?,
        payment_profile_id: row.try_get("payment_profile_id")?,
        card_number: row.try_get::<Option<MaskedCardNumber>, _>("card_number")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

const PAYMENT_PROFILE_COLUMNS: &str = "id, customer_profile_id, first_name, last_name, company, \
     address, city, state, zip, country, phone, fax, payment_profile_id, card_number, \
     created_at, updated_at";

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn insert_profile(
        &self,
        user_id: UserId,
        remote_profile_id: &str,
    ) -> Result<CustomerProfile, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO customer_profile (user_id, profile_id)
            VALUES ($1, $2)
            RETURNING id, user_id, profile_id, created_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(remote_profile_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("user already has a profile".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        profile_from_row(&row)
    }

    async fn get_profile(
        &self,
        id: CustomerProfileId,
    ) -> Result<Option<CustomerProfile>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, profile_id, created_at
            FROM customer_profile
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    async fn get_profile_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<CustomerProfile>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, profile_id, created_at
            FROM customer_profile
            WHERE user_id = $1
            ",
        )
        .bind(user_id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    async fn insert_payment_profile(
        &self,
        row: NewPaymentProfile,
    ) -> Result<CustomerPaymentProfile, RepositoryError> {
        let query = format!(
            r"
            INSERT INTO customer_payment_profile
                (customer_profile_id, first_name, last_name, company, address, city,
                 state, zip, country, phone, fax, payment_profile_id, card_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {PAYMENT_PROFILE_COLUMNS}
            "
        );
        let inserted = sqlx::query(&query)
            .bind(row.customer_profile_id.as_i32())
            .bind(&row.billing.first_name)
            .bind(&row.billing.last_name)
            .bind(&row.billing.company)
            .bind(&row.billing.address)
            .bind(&row.billing.city)
            .bind(&row.billing.state)
            .bind(&row.billing.zip)
            .bind(&row.billing.country)
            .bind(&row.billing.phone)
            .bind(&row.billing.fax)
            .bind(&row.payment_profile_id)
            .bind(row.card_number.as_ref().map(MaskedCardNumber::as_str))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict(
                        "payment profile already exists for this profile".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        payment_profile_from_row(&inserted)
    }

    async fn update_payment_profile(
        &self,
        row: &CustomerPaymentProfile,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customer_payment_profile
            SET first_name = $1, last_name = $2, company = $3, address = $4,
                city = $5, state = $6, zip = $7, country = $8, phone = $9,
                fax = $10, card_number = $11, updated_at = now()
            WHERE id = $12
            ",
        )
        .bind(&row.first_name)
        .bind(&row.last_name)
        .bind(&row.company)
        .bind(&row.address)
        .bind(&row.city)
        .bind(&row.state)
        .bind(&row.zip)
        .bind(&row.country)
        .bind(&row.phone)
        .bind(&row.fax)
        .bind(row.card_number.as_ref().map(MaskedCardNumber::as_str))
        .bind(row.id.as_i32())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn find_payment_profile(
        &self,
        customer_profile_id: CustomerProfileId,
        payment_profile_id: &str,
    ) -> Result<Option<CustomerPaymentProfile>, RepositoryError> {
        let query = format!(
            r"
            SELECT {PAYMENT_PROFILE_COLUMNS}
            FROM customer_payment_profile
            WHERE customer_profile_id = $1 AND payment_profile_id = $2
            "
        );
        let row = sqlx::query(&query)
            .bind(customer_profile_id.as_i32())
            .bind(payment_profile_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(payment_profile_from_row).transpose()
    }

    async fn list_payment_profiles(
        &self,
        customer_profile_id: CustomerProfileId,
    ) -> Result<Vec<CustomerPaymentProfile>, RepositoryError> {
        let query = format!(
            r"
            SELECT {PAYMENT_PROFILE_COLUMNS}
            FROM customer_payment_profile
            WHERE customer_profile_id = $1
            ORDER BY id ASC
            "
        );
        let rows = sqlx::query(&query)
            .bind(customer_profile_id.as_i32())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(payment_profile_from_row).collect()
    }

    async fn delete_payment_profile(
        &self,
        id: PaymentProfileId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM customer_payment_profile
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
