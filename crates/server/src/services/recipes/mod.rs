//! Recipe service.
//!
//! Turns a submitted [`RecipeForm`] into a validated [`RecipeDraft`], writes
//! it through the repository with author checks, and assembles
//! [`RecipeCard`]s for display.

mod error;

pub use error::RecipeError;

use std::collections::HashSet;

use serde::Deserialize;
use sqlx::PgPool;
use tracing::instrument;

use foodgram_core::{Amount, CookingTime, IngredientId, RecipeId, TagId, UserId};

use crate::db::{
    FollowRepository, IngredientRepository, RecipeList, RecipeListRepository, RecipeRepository,
    RepositoryError, TagRepository, UserRepository,
};
use crate::models::{Recipe, RecipeCard, RecipeDraft};
use crate::services::images::decode_data_url;

/// Maximum recipe name length in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// One `{id, amount}` entry of a submitted recipe.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientAmount {
    pub id: IngredientId,
    pub amount: i64,
}

/// Recipe as submitted by a client on create or update.
///
/// Quantities arrive as plain integers so that range errors are reported
/// with the recipe's own messages.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeForm {
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<TagId>,
    #[serde(default)]
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
}

/// Validate everything about a form that needs no database.
///
/// # Errors
///
/// Returns the first [`RecipeError`] found.
pub fn check_form(form: &RecipeForm, max_image_bytes: usize) -> Result<RecipeDraft, RecipeError> {
    let name = form.name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
        return Err(RecipeError::InvalidName {
            max: MAX_NAME_LENGTH,
        });
    }
    let text = form.text.trim();
    if text.is_empty() {
        return Err(RecipeError::EmptyText);
    }
    let cooking_time = CookingTime::new(form.cooking_time)?;

    if form.ingredients.is_empty() {
        return Err(RecipeError::EmptyIngredients);
    }
    let mut seen = HashSet::new();
    let mut ingredients = Vec::with_capacity(form.ingredients.len());
    for line in &form.ingredients {
        if !seen.insert(line.id) {
            return Err(RecipeError::DuplicateIngredient(line.id));
        }
        ingredients.push((line.id, Amount::new(line.amount)?));
    }

    if form.tags.is_empty() {
        return Err(RecipeError::EmptyTags);
    }
    let mut seen = HashSet::new();
    for tag in &form.tags {
        if !seen.insert(*tag) {
            return Err(RecipeError::DuplicateTag(*tag));
        }
    }

    let image = form
        .image
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| decode_data_url(s, max_image_bytes))
        .transpose()?;

    Ok(RecipeDraft {
        name: name.to_owned(),
        text: text.to_owned(),
        cooking_time,
        tags: form.tags.clone(),
        ingredients,
        image,
    })
}

/// Recipe service.
pub struct RecipeService<'a> {
    pool: &'a PgPool,
    max_image_bytes: usize,
}

impl<'a> RecipeService<'a> {
    /// Create a new recipe service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, max_image_bytes: usize) -> Self {
        Self {
            pool,
            max_image_bytes,
        }
    }

    /// Validate a form, including that every referenced tag and ingredient
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns a validation [`RecipeError`] or `RecipeError::Repository`.
    pub async fn validate(&self, form: &RecipeForm) -> Result<RecipeDraft, RecipeError> {
        let draft = check_form(form, self.max_image_bytes)?;

        let ingredient_ids: Vec<IngredientId> = draft.ingredients.iter().map(|(id, _)| *id).collect();
        let found = IngredientRepository::new(self.pool)
            .count_existing(&ingredient_ids)
            .await?;
        if usize::try_from(found).ok() != Some(ingredient_ids.len()) {
            return Err(RecipeError::UnknownIngredient);
        }

        let found = TagRepository::new(self.pool)
            .count_existing(&draft.tags)
            .await?;
        if usize::try_from(found).ok() != Some(draft.tags.len()) {
            return Err(RecipeError::UnknownTag);
        }

        Ok(draft)
    }

    /// Publish a new recipe. The image is mandatory.
    ///
    /// # Errors
    ///
    /// Returns a validation [`RecipeError`] or `RecipeError::Repository`.
    #[instrument(skip(self, form), fields(author = %author))]
    pub async fn create(&self, author: UserId, form: &RecipeForm) -> Result<Recipe, RecipeError> {
        let draft = self.validate(form).await?;
        if draft.image.is_none() {
            return Err(RecipeError::MissingImage);
        }

        let recipe = RecipeRepository::new(self.pool)
            .create(author, &draft)
            .await?;
        tracing::info!(recipe_id = %recipe.id, "Recipe published");
        Ok(recipe)
    }

    /// Replace a recipe's content. Only its author may do this.
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::NotFound`, `RecipeError::NotAuthor`, a
    /// validation error, or `RecipeError::Repository`.
    #[instrument(skip(self, form), fields(editor = %editor, recipe_id = %id))]
    pub async fn update(
        &self,
        editor: UserId,
        id: RecipeId,
        form: &RecipeForm,
    ) -> Result<Recipe, RecipeError> {
        self.authorize(editor, id).await?;
        let draft = self.validate(form).await?;

        RecipeRepository::new(self.pool)
            .update(id, &draft)
            .await?
            .ok_or(RecipeError::NotFound)
    }

    /// Delete a recipe. Only its author may do this.
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::NotFound`, `RecipeError::NotAuthor`, or
    /// `RecipeError::Repository`.
    #[instrument(skip(self), fields(editor = %editor, recipe_id = %id))]
    pub async fn delete(&self, editor: UserId, id: RecipeId) -> Result<(), RecipeError> {
        self.authorize(editor, id).await?;
        if RecipeRepository::new(self.pool).delete(id).await? {
            tracing::info!("Recipe deleted");
            Ok(())
        } else {
            Err(RecipeError::NotFound)
        }
    }

    async fn authorize(&self, editor: UserId, id: RecipeId) -> Result<(), RecipeError> {
        let recipe = RecipeRepository::new(self.pool)
            .get(id)
            .await?
            .ok_or(RecipeError::NotFound)?;
        if recipe.author_id == editor {
            Ok(())
        } else {
            Err(RecipeError::NotAuthor)
        }
    }

    /// Assemble display cards for `recipes`, preserving their order.
    ///
    /// Associations are loaded in one batch per kind, so the number of
    /// queries does not grow with the number of recipes.
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::Repository` if a query fails or a recipe's
    /// author is missing.
    pub async fn cards(
        &self,
        viewer: Option<UserId>,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeCard>, RecipeError> {
        let ids: Vec<RecipeId> = recipes.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<UserId> = recipes.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors = UserRepository::new(self.pool).get_many(&author_ids).await?;
        let mut tags = TagRepository::new(self.pool).for_recipes(&ids).await?;
        let mut lines = RecipeRepository::new(self.pool).lines_for(&ids).await?;

        let (followed, favorites, cart) = match viewer {
            Some(viewer) => (
                FollowRepository::new(self.pool)
                    .following_among(viewer, &author_ids)
                    .await?,
                RecipeListRepository::new(self.pool, RecipeList::Favorites)
                    .contains_among(viewer, &ids)
                    .await?,
                RecipeListRepository::new(self.pool, RecipeList::ShoppingCart)
                    .contains_among(viewer, &ids)
                    .await?,
            ),
            None => Default::default(),
        };

        recipes
            .into_iter()
            .map(|recipe| {
                let author = authors
                    .get(&recipe.author_id)
                    .cloned()
                    .ok_or_else(|| {
                        RepositoryError::DataCorruption(format!(
                            "recipe {} has no author",
                            recipe.id
                        ))
                    })?;
                Ok(RecipeCard {
                    author_followed: followed.contains(&author.id),
                    author,
                    tags: tags.remove(&recipe.id).unwrap_or_default(),
                    ingredients: lines.remove(&recipe.id).unwrap_or_default(),
                    is_favorited: favorites.contains(&recipe.id),
                    is_in_shopping_cart: cart.contains(&recipe.id),
                    recipe,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()
            .map_err(RecipeError::from)
    }

    /// Assemble the display card of one recipe.
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::NotFound` or `RecipeError::Repository`.
    pub async fn card(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeCard, RecipeError> {
        let recipe = RecipeRepository::new(self.pool)
            .get(id)
            .await?
            .ok_or(RecipeError::NotFound)?;
        self.cards(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or(RecipeError::NotFound)
    }
}
