//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! store-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `BILLING_DATABASE_URL` - `PostgreSQL` connection string for billing
//!   (falls back to `DATABASE_URL`)
//!
//! Migration files live in `crates/billing/migrations/` and are embedded
//! into the billing library at compile time.

use secrecy::SecretString;

use samplestore_billing::db;

/// Errors that can occur while running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run billing database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration cannot be applied.
pub async fn billing() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("BILLING_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("BILLING_DATABASE_URL"))?;

    tracing::info!("Connecting to billing database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running billing migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Billing migrations complete!");
    Ok(())
}
