//! JSON shapes returned by the API.

use serde::Serialize;
use url::Url;

use foodgram_core::{
    Amount, CookingTime, Email, HexColor, IngredientId, RecipeId, Slug, TagId, UserId, Username,
};

use super::pagination::absolute_url;
use crate::models::{Ingredient, IngredientLine, Recipe, RecipeCard, Tag, User};

/// Public profile of a user, relative to the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub email: Email,
    pub id: UserId,
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserView {
    #[must_use]
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagView {
    pub id: TagId,
    pub name: String,
    pub color: Option<HexColor>,
    pub slug: Slug,
}

impl From<Tag> for TagView {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientView {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientView {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// An ingredient line inside a recipe.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientAmountView {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: Amount,
}

impl From<IngredientLine> for IngredientAmountView {
    fn from(line: IngredientLine) -> Self {
        Self {
            id: line.ingredient.id,
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Full display view of a recipe.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: RecipeId,
    pub tags: Vec<TagView>,
    pub author: UserView,
    pub ingredients: Vec<IngredientAmountView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: CookingTime,
}

impl RecipeDetail {
    #[must_use]
    pub fn new(card: RecipeCard, base_url: &Url) -> Self {
        let image = image_url(base_url, &card.recipe);
        Self {
            id: card.recipe.id,
            tags: card.tags.into_iter().map(TagView::from).collect(),
            author: UserView::new(card.author, card.author_followed),
            ingredients: card
                .ingredients
                .into_iter()
                .map(IngredientAmountView::from)
                .collect(),
            is_favorited: card.is_favorited,
            is_in_shopping_cart: card.is_in_shopping_cart,
            name: card.recipe.name,
            image,
            text: card.recipe.text,
            cooking_time: card.recipe.cooking_time,
        }
    }
}

/// Short recipe view used in subscriptions and favorite/cart responses.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeSummaryView {
    pub id: RecipeId,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: CookingTime,
}

impl RecipeSummaryView {
    #[must_use]
    pub fn new(recipe: Recipe, base_url: &Url) -> Self {
        Self {
            image: image_url(base_url, &recipe),
            id: recipe.id,
            name: recipe.name,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub user: UserView,
    pub recipes: Vec<RecipeSummaryView>,
    pub recipes_count: i64,
}

/// Public URL of a recipe's image, if it has one.
#[must_use]
pub fn image_url(base_url: &Url, recipe: &Recipe) -> Option<String> {
    recipe
        .has_image
        .then(|| absolute_url(base_url, &format!("/media/recipes/{}/image", recipe.id)).to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn recipe(has_image: bool) -> Recipe {
        Recipe {
            id: RecipeId::new(4),
            author_id: UserId::new(1),
            name: "Omelette".to_string(),
            text: "Whisk and fry.".to_string(),
            cooking_time: CookingTime::new(10).unwrap(),
            has_image,
            pub_date: Utc::now(),
        }
    }

    fn user() -> User {
        User {
            id: UserId::new(1),
            email: Email::parse("anna@example.com").unwrap(),
            username: Username::parse("anna").unwrap(),
            first_name: "Anna".to_string(),
            last_name: "K".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_view_shape() {
        let base = Url::parse("http://localhost:8000").unwrap();
        let json = serde_json::to_value(RecipeSummaryView::new(recipe(true), &base)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 4,
                "name": "Omelette",
                "image": "http://localhost:8000/media/recipes/4/image",
                "cooking_time": 10,
            })
        );
    }

    #[test]
    fn test_image_url_absent_without_image() {
        let base = Url::parse("http://localhost:8000").unwrap();
        assert!(image_url(&base, &recipe(false)).is_none());
    }

    #[test]
    fn test_subscription_view_flattens_user() {
        let view = SubscriptionView {
            user: UserView::new(user(), true),
            recipes: vec![],
            recipes_count: 0,
        };
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["username"], "anna");
        assert_eq!(json["is_subscribed"], true);
        assert_eq!(json["recipes_count"], 0);
    }
}
