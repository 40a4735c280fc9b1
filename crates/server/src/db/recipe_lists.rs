//! Per-user recipe lists: favorites and the shopping cart.
//!
//! Both are plain `(user_id, recipe_id)` sets with identical semantics, so
//! one repository serves both, parameterized by [`RecipeList`].

use std::collections::HashSet;

use sqlx::PgPool;

use foodgram_core::{RecipeId, UserId};

use super::RepositoryError;

/// Which per-user recipe set to operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeList {
    Favorites,
    ShoppingCart,
}

impl RecipeList {
    const fn table(self) -> &'static str {
        match self {
            Self::Favorites => "foodgram.favorite",
            Self::ShoppingCart => "foodgram.shopping_cart",
        }
    }

    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

/// Repository for one per-user recipe list.
pub struct RecipeListRepository<'a> {
    pool: &'a PgPool,
    list: RecipeList,
}

impl<'a> RecipeListRepository<'a> {
    /// Create a repository for the given list.
    #[must_use]
    pub const fn new(pool: &'a PgPool, list: RecipeList) -> Self {
        Self { pool, list }
    }

    /// Add a recipe to the user's list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the recipe is already listed.
    /// Returns `RepositoryError::NotFound` if the recipe does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(&self, user: UserId, recipe: RecipeId) -> Result<(), RepositoryError> {
        let sql = format!(
            "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2)",
            self.list.table()
        );
        sqlx::query(&sql)
            .bind(user)
            .bind(recipe)
            .execute(self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    RepositoryError::NotFound
                }
                other => RepositoryError::from_unique(
                    other,
                    &format!("recipe is already in {}", self.list.label()),
                ),
            })?;
        Ok(())
    }

    /// Remove a recipe from the user's list. Returns `false` if it was not
    /// listed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(&self, user: UserId, recipe: RecipeId) -> Result<bool, RepositoryError> {
        let sql = format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            self.list.table()
        );
        let result = sqlx::query(&sql)
            .bind(user)
            .bind(recipe)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Which of `recipes` are on the user's list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contains_among(
        &self,
        user: UserId,
        recipes: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, RepositoryError> {
        if recipes.is_empty() {
            return Ok(HashSet::new());
        }
        let raw: Vec<i32> = recipes.iter().map(RecipeId::as_i32).collect();
        let sql = format!(
            "SELECT recipe_id FROM {} WHERE user_id = $1 AND recipe_id = ANY($2)",
            self.list.table()
        );
        let rows: Vec<RecipeId> = sqlx::query_scalar(&sql)
            .bind(user)
            .bind(raw)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_use_distinct_tables() {
        assert_ne!(
            RecipeList::Favorites.table(),
            RecipeList::ShoppingCart.table()
        );
        assert_eq!(RecipeList::ShoppingCart.label(), "shopping cart");
    }
}
