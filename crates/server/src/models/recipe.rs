//! Recipe domain types.

use chrono::{DateTime, Utc};

use foodgram_core::{Amount, CookingTime, IngredientId, RecipeId, Slug, TagId, UserId};

use super::{Ingredient, Tag, User};

/// A published recipe, without its associations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub name: String,
    pub text: String,
    pub cooking_time: CookingTime,
    /// Whether image bytes are stored for this recipe.
    pub has_image: bool,
    pub pub_date: DateTime<Utc>,
}

/// One ingredient line of a recipe, joined with the ingredient itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub ingredient: Ingredient,
    pub amount: Amount,
}

/// Decoded recipe image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeImage {
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Validated recipe content, ready to be written.
///
/// Writing a draft always replaces the recipe's tags and ingredient lines
/// wholesale. `image: None` on update keeps the stored image.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub cooking_time: CookingTime,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<(IngredientId, Amount)>,
    pub image: Option<RecipeImage>,
}

/// Recipe listing filters.
///
/// All set filters must match. `tags` matches recipes carrying any of the
/// given slugs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    pub tags: Vec<Slug>,
    pub favorited_by: Option<UserId>,
    pub in_cart_of: Option<UserId>,
}

/// A recipe with everything needed to display it to one viewer.
///
/// The viewer-relative flags are all `false` for anonymous viewers.
#[derive(Debug, Clone)]
pub struct RecipeCard {
    pub recipe: Recipe,
    pub author: User,
    /// Whether the viewer follows the author.
    pub author_followed: bool,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<IngredientLine>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}
