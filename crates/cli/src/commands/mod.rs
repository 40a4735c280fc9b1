//! Subcommand implementations.
//!
//! # Environment Variables
//!
//! - `FOODGRAM_DATABASE_URL` (fallback `DATABASE_URL`) - `PostgreSQL` connection string

pub mod load;
pub mod migrate;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;

/// Shared failure to reach the database.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connect to the database named by the environment.
pub async fn connect() -> Result<PgPool, ConnectError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("FOODGRAM_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConnectError::MissingEnvVar("FOODGRAM_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(foodgram_server::db::create_pool(&database_url).await?)
}
