//! Customer repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};

use samplestore_core::{CustomerId, UserId};

use super::{CustomerStore, RepositoryError};
use crate::models::Customer;

/// Repository for customer database operations.
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn customer_from_row(row: &PgRow) -> Result<Customer, RepositoryError> {
    Ok(Customer {
        id: row.try_get::<CustomerId, _>("id")?,
        user_id: row.try_get::<UserId, _>("user_id")?,
        shipping_same_as_billing: row.try_get("shipping_same_as_billing")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl CustomerStore for CustomerRepository {
    /// Get or create the customer row for a user.
    ///
    /// The upsert is keyed on `user_id`, so repeated calls for the same
    /// user return the same row.
    async fn ensure_customer(&self, user_id: UserId) -> Result<Customer, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO customer (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, shipping_same_as_billing, created_at
            ",
        )
        .bind(user_id.as_i32())
        .fetch_one(&self.pool)
        .await?;

        customer_from_row(&row)
    }

    async fn get_by_user(&self, user_id: UserId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, shipping_same_as_billing, created_at
            FROM customer
            WHERE user_id = $1
            ",
        )
        .bind(user_id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(customer_from_row).transpose()
    }
}
