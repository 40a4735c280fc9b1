//! Ingredient repository.

use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use foodgram_core::IngredientId;

use super::RepositoryError;
use crate::models::Ingredient;

#[derive(Debug, FromRow)]
pub(crate) struct IngredientRow {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            measurement_unit: row.measurement_unit,
        }
    }
}

/// Rows per multi-row insert; keeps bind parameters well under the
/// `PostgreSQL` limit of 65535.
const INSERT_CHUNK: usize = 1000;

/// Repository for ingredient reference data.
pub struct IngredientRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> IngredientRepository<'a> {
    /// Create a new ingredient repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Ingredients whose name starts with `prefix` (case-insensitive),
    /// ordered by name. An empty prefix lists everything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, prefix: &str) -> Result<Vec<Ingredient>, RepositoryError> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            r"
            SELECT id, name, measurement_unit
            FROM foodgram.ingredient
            WHERE lower(name) LIKE lower($1) || '%'
            ORDER BY name, measurement_unit
            ",
        )
        .bind(escape_like(prefix))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    /// Get an ingredient by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: IngredientId) -> Result<Option<Ingredient>, RepositoryError> {
        let row = sqlx::query_as::<_, IngredientRow>(
            "SELECT id, name, measurement_unit FROM foodgram.ingredient WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Ingredient::from))
    }

    /// How many of the given IDs exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_existing(&self, ids: &[IngredientId]) -> Result<i64, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(IngredientId::as_i32).collect();
        let count =
            sqlx::query_scalar("SELECT COUNT(*) FROM foodgram.ingredient WHERE id = ANY($1)")
                .bind(raw)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }

    /// Bulk insert `(name, unit)` pairs, skipping pairs that already exist.
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; earlier
    /// chunks stay committed.
    pub async fn insert_many(&self, items: &[(String, String)]) -> Result<u64, RepositoryError> {
        let mut inserted = 0;
        for chunk in items.chunks(INSERT_CHUNK) {
            let mut builder: QueryBuilder<'_, Postgres> =
                QueryBuilder::new("INSERT INTO foodgram.ingredient (name, measurement_unit) ");
            builder.push_values(chunk, |mut row, (name, unit)| {
                row.push_bind(name).push_bind(unit);
            });
            builder.push(" ON CONFLICT (name, measurement_unit) DO NOTHING");

            inserted += builder.build().execute(self.pool).await?.rows_affected();
        }
        Ok(inserted)
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("мука"), "мука");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
