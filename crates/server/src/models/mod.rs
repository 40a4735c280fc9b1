//! Domain models for the Foodgram server.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`] and the JSON views in [`crate::routes`].

pub mod ingredient;
pub mod recipe;
pub mod shopping_list;
pub mod tag;
pub mod user;

pub use ingredient::Ingredient;
pub use recipe::{
    IngredientLine, Recipe, RecipeCard, RecipeDraft, RecipeFilter, RecipeImage,
};
pub use shopping_list::AggregatedLine;
pub use tag::Tag;
pub use user::{NewUser, User};
