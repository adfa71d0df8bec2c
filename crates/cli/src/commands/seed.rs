//! Seed the catalog with sample items.

use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::info;

use samplestore_billing::db::{self, CatalogRepository};
use samplestore_core::{CurrencyCode, Price};

const SAMPLE_ITEMS: &[(&str, &str)] = &[
    ("Blue T-Shirt", "19.99"),
    ("Coffee Mug", "8.50"),
    ("Canvas Tote", "14.00"),
    ("Sticker Pack", "4.25"),
];

/// Seed sample items into the catalog.
///
/// # Arguments
///
/// * `clear_existing` - If true, delete existing items first
///
/// # Errors
///
/// Returns an error if environment variables are missing or database
/// operations fail.
pub async fn catalog(clear_existing: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = std::env::var("BILLING_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "BILLING_DATABASE_URL not set")?;

    // Connect to database
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    if clear_existing {
        sqlx::query("DELETE FROM item").execute(&pool).await?;
        info!("Cleared existing items");
    }

    let catalog = CatalogRepository::new(pool);

    let mut inserted = 0;
    for (title, price) in SAMPLE_ITEMS {
        let amount = Decimal::from_str(price)?;
        let item = catalog
            .create_item(title, Price::new(amount, CurrencyCode::USD))
            .await?;
        info!(item_id = %item.id, title, "Item inserted");
        inserted += 1;
    }

    info!("Seeding complete!");
    info!("  Items inserted: {inserted}");

    Ok(())
}
