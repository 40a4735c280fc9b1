//! Database operations for Foodgram `PostgreSQL`.
//!
//! # Schema: `foodgram`
//!
//! ## Tables
//!
//! - `user` - Accounts (authentication itself is token based)
//! - `auth_token` - SHA-256 hashes of issued API tokens
//! - `follow` - Subscriptions between users
//! - `tag` - Recipe tags (seeded reference data)
//! - `ingredient` - Ingredient reference data, unique by (name, unit)
//! - `recipe` - Recipes, including the uploaded image bytes
//! - `recipe_tag` - Recipe <-> tag
//! - `recipe_ingredient` - Recipe line items with amounts
//! - `favorite` - User <-> recipe favorites
//! - `shopping_cart` - User <-> recipe cart membership
//!
//! Every association cascades on delete of either side.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p foodgram-cli -- migrate
//! ```

pub mod follows;
pub mod ingredients;
pub mod recipe_lists;
pub mod recipes;
pub mod shopping_list;
pub mod tags;
pub mod tokens;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use follows::FollowRepository;
pub use ingredients::IngredientRepository;
pub use recipe_lists::{RecipeList, RecipeListRepository};
pub use recipes::RecipeRepository;
pub use shopping_list::ShoppingListRepository;
pub use tags::TagRepository;
pub use tokens::TokenRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map unique-constraint violations to `Conflict`, everything else to `Database`.
    pub(crate) fn from_unique(err: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict.to_owned());
        }
        Self::Database(err)
    }
}

/// Offset-based window into a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

/// One page of a listing plus the size of the whole listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    /// Convert every item, keeping the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
