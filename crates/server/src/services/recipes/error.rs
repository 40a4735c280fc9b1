//! Recipe service error types.

use thiserror::Error;

use foodgram_core::{IngredientId, QuantityError, TagId};

use crate::db::RepositoryError;
use crate::services::images::ImageError;

/// Errors that can occur while validating or writing recipes.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("a recipe needs at least one ingredient")]
    EmptyIngredients,

    #[error("ingredient {0} is listed more than once")]
    DuplicateIngredient(IngredientId),

    #[error("one or more ingredients do not exist")]
    UnknownIngredient,

    #[error("a recipe needs at least one tag")]
    EmptyTags,

    #[error("tag {0} is listed more than once")]
    DuplicateTag(TagId),

    #[error("one or more tags do not exist")]
    UnknownTag,

    #[error("an image is required")]
    MissingImage,

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Quantity(#[from] QuantityError),

    #[error("name must be 1-{max} characters")]
    InvalidName { max: usize },

    #[error("text cannot be empty")]
    EmptyText,

    #[error("recipe not found")]
    NotFound,

    #[error("only the author can change this recipe")]
    NotAuthor,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl RecipeError {
    /// Whether the error was caused by the submitted form.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::NotFound | Self::NotAuthor | Self::Repository(_))
    }
}
