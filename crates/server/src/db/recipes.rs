//! Recipe repository.
//!
//! A recipe's tags and ingredient lines are always written together with the
//! recipe row in one transaction, and an update replaces both sets wholesale.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};

use foodgram_core::{Amount, CookingTime, RecipeId, UserId};

use super::ingredients::IngredientRow;
use super::{Page, PageRequest, RepositoryError};
use crate::models::{Ingredient, IngredientLine, Recipe, RecipeDraft, RecipeFilter, RecipeImage};

const RECIPE_COLUMNS: &str = "r.id, r.author_id, r.name, r.text, r.cooking_time, \
     (r.image_data IS NOT NULL) AS has_image, r.pub_date";

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: RecipeId,
    author_id: UserId,
    name: String,
    text: String,
    cooking_time: i32,
    has_image: bool,
    pub_date: DateTime<Utc>,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = RepositoryError;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        let cooking_time = CookingTime::new(i64::from(row.cooking_time)).map_err(|e| {
            RepositoryError::DataCorruption(format!("recipe {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            author_id: row.author_id,
            name: row.name,
            text: row.text,
            cooking_time,
            has_image: row.has_image,
            pub_date: row.pub_date,
        })
    }
}

#[derive(Debug, FromRow)]
struct LineRow {
    recipe_id: RecipeId,
    #[sqlx(flatten)]
    ingredient: IngredientRow,
    amount: i32,
}

fn collect_recipes(rows: Vec<RecipeRow>) -> Result<Vec<Recipe>, RepositoryError> {
    rows.into_iter().map(Recipe::try_from).collect()
}

/// Append `AND ...` clauses for every set filter. Expects the recipe table
/// aliased as `r` and a preceding `WHERE TRUE`.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &RecipeFilter) {
    if let Some(author) = filter.author {
        builder.push(" AND r.author_id = ").push_bind(author);
    }
    if !filter.tags.is_empty() {
        let slugs: Vec<String> = filter.tags.iter().map(|s| s.as_str().to_owned()).collect();
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM foodgram.recipe_tag rt \
                 JOIN foodgram.tag t ON t.id = rt.tag_id \
                 WHERE rt.recipe_id = r.id AND t.slug = ANY(",
            )
            .push_bind(slugs)
            .push("))");
    }
    if let Some(user) = filter.favorited_by {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM foodgram.favorite f \
                 WHERE f.recipe_id = r.id AND f.user_id = ",
            )
            .push_bind(user)
            .push(")");
    }
    if let Some(user) = filter.in_cart_of {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM foodgram.shopping_cart sc \
                 WHERE sc.recipe_id = r.id AND sc.user_id = ",
            )
            .push_bind(user)
            .push(")");
    }
}

/// Repository for recipe database operations.
pub struct RecipeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RecipeRepository<'a> {
    /// Create a new recipe repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Publish a recipe with its tags and ingredient lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails, including
    /// foreign key violations for unknown tags or ingredients. Nothing is
    /// written in that case.
    pub async fn create(
        &self,
        author: UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r"
            INSERT INTO foodgram.recipe AS r
                (author_id, name, text, cooking_time, image_data, image_content_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RECIPE_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(author)
            .bind(&draft.name)
            .bind(&draft.text)
            .bind(draft.cooking_time.get())
            .bind(draft.image.as_ref().map(|i| i.bytes.as_slice()))
            .bind(draft.image.as_ref().map(|i| i.content_type.as_str()))
            .fetch_one(&mut *tx)
            .await?;

        write_associations(&mut tx, row.id, draft).await?;
        tx.commit().await?;

        row.try_into()
    }

    /// Overwrite a recipe's content and replace its tags and lines.
    ///
    /// A draft without an image keeps the stored one. Returns `None` if the
    /// recipe does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails. Nothing is
    /// written in that case.
    pub async fn update(
        &self,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r"
            UPDATE foodgram.recipe AS r
            SET name = $2,
                text = $3,
                cooking_time = $4,
                image_data = COALESCE($5, r.image_data),
                image_content_type = COALESCE($6, r.image_content_type)
            WHERE r.id = $1
            RETURNING {RECIPE_COLUMNS}
            "
        );
        let Some(row) = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.text)
            .bind(draft.cooking_time.get())
            .bind(draft.image.as_ref().map(|i| i.bytes.as_slice()))
            .bind(draft.image.as_ref().map(|i| i.content_type.as_str()))
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM foodgram.recipe_tag WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM foodgram.recipe_ingredient WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        write_associations(&mut tx, id, draft).await?;
        tx.commit().await?;

        row.try_into().map(Some)
    }

    /// Delete a recipe. Its lines, tags, favorites and cart entries go with
    /// it. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: RecipeId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM foodgram.recipe WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get a recipe by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let sql = format!("SELECT {RECIPE_COLUMNS} FROM foodgram.recipe r WHERE r.id = $1");
        sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(Recipe::try_from)
            .transpose()
    }

    /// Filtered listing, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RepositoryError> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM foodgram.recipe r WHERE TRUE");
        push_filters(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(self.pool).await?;

        let mut select = QueryBuilder::new(format!(
            "SELECT {RECIPE_COLUMNS} FROM foodgram.recipe r WHERE TRUE"
        ));
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY r.pub_date DESC, r.id DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset);

        let rows = select
            .build_query_as::<RecipeRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(Page {
            items: collect_recipes(rows)?,
            total,
        })
    }

    /// Newest recipes of each given author, at most `limit` per author
    /// (`None` for all).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_by_authors(
        &self,
        authors: &[UserId],
        limit: Option<i64>,
    ) -> Result<HashMap<UserId, Vec<Recipe>>, RepositoryError> {
        if authors.is_empty() {
            return Ok(HashMap::new());
        }
        let raw: Vec<i32> = authors.iter().map(UserId::as_i32).collect();
        let sql = format!(
            r"
            SELECT * FROM (
                SELECT {RECIPE_COLUMNS},
                       row_number() OVER (
                           PARTITION BY r.author_id ORDER BY r.pub_date DESC, r.id DESC
                       ) AS position
                FROM foodgram.recipe r
                WHERE r.author_id = ANY($1)
            ) ranked
            WHERE $2::BIGINT IS NULL OR position <= $2
            ORDER BY author_id, position
            "
        );
        let rows = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(raw)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        let mut by_author: HashMap<UserId, Vec<Recipe>> = HashMap::new();
        for recipe in collect_recipes(rows)? {
            by_author.entry(recipe.author_id).or_default().push(recipe);
        }
        Ok(by_author)
    }

    /// Number of recipes per author. Authors without recipes are absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_authors(
        &self,
        authors: &[UserId],
    ) -> Result<HashMap<UserId, i64>, RepositoryError> {
        if authors.is_empty() {
            return Ok(HashMap::new());
        }
        let raw: Vec<i32> = authors.iter().map(UserId::as_i32).collect();
        let rows: Vec<(UserId, i64)> = sqlx::query_as(
            r"
            SELECT author_id, COUNT(*)
            FROM foodgram.recipe
            WHERE author_id = ANY($1)
            GROUP BY author_id
            ",
        )
        .bind(raw)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Ingredient lines of several recipes, each ordered by ingredient name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for(
        &self,
        recipes: &[RecipeId],
    ) -> Result<HashMap<RecipeId, Vec<IngredientLine>>, RepositoryError> {
        if recipes.is_empty() {
            return Ok(HashMap::new());
        }
        let raw: Vec<i32> = recipes.iter().map(RecipeId::as_i32).collect();
        let rows = sqlx::query_as::<_, LineRow>(
            r"
            SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
            FROM foodgram.recipe_ingredient ri
            JOIN foodgram.ingredient i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ANY($1)
            ORDER BY i.name, i.measurement_unit
            ",
        )
        .bind(raw)
        .fetch_all(self.pool)
        .await?;

        let mut by_recipe: HashMap<RecipeId, Vec<IngredientLine>> = HashMap::new();
        for row in rows {
            let amount = Amount::new(i64::from(row.amount)).map_err(|e| {
                RepositoryError::DataCorruption(format!("recipe {}: {e}", row.recipe_id))
            })?;
            by_recipe.entry(row.recipe_id).or_default().push(IngredientLine {
                ingredient: Ingredient::from(row.ingredient),
                amount,
            });
        }
        Ok(by_recipe)
    }

    /// Stored image of a recipe, if it has one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn image(&self, id: RecipeId) -> Result<Option<RecipeImage>, RepositoryError> {
        let row: Option<(String, Vec<u8>)> = sqlx::query_as(
            r"
            SELECT image_content_type, image_data
            FROM foodgram.recipe
            WHERE id = $1 AND image_data IS NOT NULL
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(content_type, bytes)| RecipeImage {
            content_type,
            bytes,
        }))
    }
}

/// Insert the tag links and ingredient lines of a draft.
async fn write_associations(
    tx: &mut Transaction<'_, Postgres>,
    recipe: RecipeId,
    draft: &RecipeDraft,
) -> Result<(), RepositoryError> {
    if !draft.tags.is_empty() {
        let mut tags = QueryBuilder::new("INSERT INTO foodgram.recipe_tag (recipe_id, tag_id) ");
        tags.push_values(&draft.tags, |mut row, tag| {
            row.push_bind(recipe).push_bind(*tag);
        });
        tags.build().execute(&mut **tx).await?;
    }

    if !draft.ingredients.is_empty() {
        let mut lines = QueryBuilder::new(
            "INSERT INTO foodgram.recipe_ingredient (recipe_id, ingredient_id, amount) ",
        );
        lines.push_values(&draft.ingredients, |mut row, (ingredient, amount)| {
            row.push_bind(recipe)
                .push_bind(*ingredient)
                .push_bind(amount.get());
        });
        lines.build().execute(&mut **tx).await?;
    }

    Ok(())
}
