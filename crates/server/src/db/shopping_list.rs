//! Shopping list aggregation.
//!
//! Sums ingredient amounts over every recipe in a user's cart. The grouping
//! key is `(name, measurement_unit)`, never the name alone, so "flour, g"
//! and "flour, kg" stay separate rows.

use sqlx::{FromRow, PgPool};

use foodgram_core::UserId;

use super::RepositoryError;
use crate::models::AggregatedLine;

#[derive(Debug, FromRow)]
struct AggregatedRow {
    name: String,
    measurement_unit: String,
    total_amount: i64,
}

impl From<AggregatedRow> for AggregatedLine {
    fn from(row: AggregatedRow) -> Self {
        Self {
            name: row.name,
            measurement_unit: row.measurement_unit,
            total_amount: row.total_amount,
        }
    }
}

/// Repository computing a user's aggregated shopping list.
pub struct ShoppingListRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShoppingListRepository<'a> {
    /// Create a new shopping list repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Aggregate the user's cart into one row per `(name, unit)`, ordered by
    /// name then unit. An empty cart yields an empty list.
    ///
    /// Amounts are summed as `BIGINT`, so no realistic cart overflows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn aggregate(&self, user: UserId) -> Result<Vec<AggregatedLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, AggregatedRow>(
            r"
            SELECT i.name,
                   i.measurement_unit,
                   SUM(ri.amount)::BIGINT AS total_amount
            FROM foodgram.shopping_cart sc
            JOIN foodgram.recipe_ingredient ri ON ri.recipe_id = sc.recipe_id
            JOIN foodgram.ingredient i ON i.id = ri.ingredient_id
            WHERE sc.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name, i.measurement_unit
            ",
        )
        .bind(user)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(AggregatedLine::from).collect())
    }
}
