//! Catalog and invoice repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};

use samplestore_core::{CurrencyCode, CustomerId, InvoiceId, ItemId, Price};

use super::RepositoryError;
use crate::models::{Invoice, Item};

/// Repository for item and invoice database operations.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

fn item_from_row(row: &PgRow) -> Result<Item, RepositoryError> {
    let currency: String = row.try_get("price_currency")?;
    let currency = currency.parse::<CurrencyCode>().map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
    })?;

    Ok(Item {
        id: row.try_get::<ItemId, _>("id")?,
        title: row.try_get("title")?,
        price: Price::new(row.try_get::<Decimal, _>("price_amount")?, currency),
    })
}

fn invoice_from_row(row: &PgRow) -> Result<Invoice, RepositoryError> {
    Ok(Invoice {
        id: row.try_get::<InvoiceId, _>("id")?,
        customer_id: row.try_get::<CustomerId, _>("customer_id")?,
        item_id: row.try_get::<ItemId, _>("item_id")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

impl CatalogRepository {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an item row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_item(&self, title: &str, price: Price) -> Result<Item, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO item (title, price_amount, price_currency)
            VALUES ($1, $2, $3)
            RETURNING id, title, price_amount, price_currency
            ",
        )
        .bind(title)
        .bind(price.amount)
        .bind(price.currency_code.code())
        .fetch_one(&self.pool)
        .await?;

        item_from_row(&row)
    }

    /// Get an item by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_item(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, title, price_amount, price_currency FROM item WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(item_from_row).transpose()
    }

    /// List all items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_items(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, title, price_amount, price_currency FROM item ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(item_from_row).collect()
    }

    /// Insert an invoice row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, including
    /// foreign-key violations for unknown customers or items.
    pub async fn create_invoice(
        &self,
        customer_id: CustomerId,
        item_id: ItemId,
    ) -> Result<Invoice, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO invoice (customer_id, item_id)
            VALUES ($1, $2)
            RETURNING id, customer_id, item_id, created_at
            ",
        )
        .bind(customer_id.as_i32())
        .bind(item_id.as_i32())
        .fetch_one(&self.pool)
        .await?;

        invoice_from_row(&row)
    }

    /// Get an invoice by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, customer_id, item_id, created_at FROM invoice WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(invoice_from_row).transpose()
    }

    /// List a customer's invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_invoices_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Invoice>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, customer_id, item_id, created_at
            FROM invoice
            WHERE customer_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(customer_id.as_i32())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(invoice_from_row).collect()
    }
}
