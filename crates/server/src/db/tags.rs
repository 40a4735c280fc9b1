//! Tag repository.

use std::collections::HashMap;

use sqlx::{FromRow, PgPool};

use foodgram_core::{HexColor, RecipeId, Slug, TagId};

use super::RepositoryError;
use crate::models::Tag;

#[derive(Debug, FromRow)]
struct TagRow {
    id: TagId,
    name: String,
    color: Option<String>,
    slug: String,
}

impl TryFrom<TagRow> for Tag {
    type Error = RepositoryError;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        let color = row
            .color
            .as_deref()
            .map(HexColor::parse)
            .transpose()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid tag color: {e}")))?;
        let slug = Slug::parse(&row.slug)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid tag slug: {e}")))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            color,
            slug,
        })
    }
}

#[derive(Debug, FromRow)]
struct RecipeTagRow {
    recipe_id: RecipeId,
    #[sqlx(flatten)]
    tag: TagRow,
}

/// Repository for tag reference data.
pub struct TagRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepository<'a> {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All tags, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Tag>, RepositoryError> {
        sqlx::query_as::<_, TagRow>("SELECT id, name, color, slug FROM foodgram.tag ORDER BY id")
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(Tag::try_from)
            .collect()
    }

    /// Get a tag by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: TagId) -> Result<Option<Tag>, RepositoryError> {
        sqlx::query_as::<_, TagRow>("SELECT id, name, color, slug FROM foodgram.tag WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(Tag::try_from)
            .transpose()
    }

    /// Tags of several recipes at once. Recipes without tags are absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn for_recipes(
        &self,
        recipes: &[RecipeId],
    ) -> Result<HashMap<RecipeId, Vec<Tag>>, RepositoryError> {
        if recipes.is_empty() {
            return Ok(HashMap::new());
        }
        let raw: Vec<i32> = recipes.iter().map(RecipeId::as_i32).collect();
        let rows = sqlx::query_as::<_, RecipeTagRow>(
            r"
            SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
            FROM foodgram.recipe_tag rt
            JOIN foodgram.tag t ON t.id = rt.tag_id
            WHERE rt.recipe_id = ANY($1)
            ORDER BY t.id
            ",
        )
        .bind(raw)
        .fetch_all(self.pool)
        .await?;

        let mut by_recipe: HashMap<RecipeId, Vec<Tag>> = HashMap::new();
        for row in rows {
            by_recipe
                .entry(row.recipe_id)
                .or_default()
                .push(Tag::try_from(row.tag)?);
        }
        Ok(by_recipe)
    }

    /// How many of the given IDs exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_existing(&self, ids: &[TagId]) -> Result<i64, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(TagId::as_i32).collect();
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM foodgram.tag WHERE id = ANY($1)")
            .bind(raw)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Insert a tag, or update name and color if the slug already exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        name: &str,
        color: Option<&HexColor>,
        slug: &Slug,
    ) -> Result<Tag, RepositoryError> {
        sqlx::query_as::<_, TagRow>(
            r"
            INSERT INTO foodgram.tag (name, color, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name, color = EXCLUDED.color
            RETURNING id, name, color, slug
            ",
        )
        .bind(name)
        .bind(color.map(HexColor::as_str))
        .bind(slug.as_str())
        .fetch_one(self.pool)
        .await?
        .try_into()
    }
}
