//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::FoodgramConfig;
use crate::services::shopping_list::FontFile;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: FoodgramConfig,
    pool: PgPool,
    font: FontFile,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: FoodgramConfig, pool: PgPool, font: FontFile) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool, font }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &FoodgramConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Font embedded into shopping list exports.
    #[must_use]
    pub fn font(&self) -> &FontFile {
        &self.inner.font
    }
}
