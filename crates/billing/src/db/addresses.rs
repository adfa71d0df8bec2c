//! Address repository for database operations.

use sqlx::{PgPool, Row, postgres::PgRow};

use samplestore_core::{AddressId, AddressKind, CustomerId};

use super::RepositoryError;
use crate::models::Address;

/// Field set for inserting an address row.
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub customer_id: CustomerId,
    pub kind: AddressKind,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub fax: String,
}

/// Repository for address database operations.
#[derive(Clone)]
pub struct AddressRepository {
    pool: PgPool,
}

const ADDRESS_COLUMNS: &str = "id, customer_id, kind, first_name, last_name, company, address, \
     city, state, zip_code, phone, fax";

fn address_from_row(row: &PgRow) -> Result<Address, RepositoryError> {
    let kind: String = row.try_get("kind")?;
    let kind = kind
        .parse::<AddressKind>()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid kind in database: {e}")))?;

    Ok(Address {
        id: row.try_get::<AddressId, _>("id")?,
        customer_id: row.try_get::<CustomerId, _>("customer_id")?,
        kind,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        company: row.try_get("company")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        zip_code: row.try_get("zip_code")?,
        phone: row.try_get("phone")?,
        fax: row.try_get("fax")?,
    })
}

impl AddressRepository {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an address row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: NewAddress) -> Result<Address, RepositoryError> {
        let query = format!(
            r"
            INSERT INTO address
                (customer_id, kind, first_name, last_name, company, address,
                 city, state, zip_code, phone, fax)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ADDRESS_COLUMNS}
            "
        );
        let row = sqlx::query(&query)
            .bind(new.customer_id.as_i32())
            .bind(new.kind.to_string())
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(&new.company)
            .bind(&new.address)
            .bind(&new.city)
            .bind(&new.state)
            .bind(&new.zip_code)
            .bind(&new.phone)
            .bind(&new.fax)
            .fetch_one(&self.pool)
            .await?;

        address_from_row(&row)
    }

    /// Get an address by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let query = format!("SELECT {ADDRESS_COLUMNS} FROM address WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(address_from_row).transpose()
    }

    /// List a customer's addresses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Address>, RepositoryError> {
        let query = format!(
            "SELECT {ADDRESS_COLUMNS} FROM address WHERE customer_id = $1 ORDER BY id ASC"
        );
        let rows = sqlx::query(&query)
            .bind(customer_id.as_i32())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(address_from_row).collect()
    }

    /// Delete an address by its ID.
    ///
    /// Returns `true` if the address was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: AddressId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM address WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
