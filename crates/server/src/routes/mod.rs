//! HTTP route handlers for the Foodgram API.
//!
//! # Route Structure
//!
//! ```text
//! # Users
//! GET    /api/users                          - User listing (paginated)
//! GET    /api/users/me                       - Current user (auth)
//! GET    /api/users/subscriptions            - Followed authors with recipes (auth)
//! GET    /api/users/{id}                     - User profile
//! POST   /api/users/{id}/subscribe           - Follow an author (auth)
//! DELETE /api/users/{id}/subscribe           - Unfollow an author (auth)
//!
//! # Reference data
//! GET    /api/tags                           - All tags
//! GET    /api/tags/{id}                      - Single tag
//! GET    /api/ingredients?name=              - Ingredient prefix search
//! GET    /api/ingredients/{id}               - Single ingredient
//!
//! # Recipes
//! GET    /api/recipes                        - Recipe listing (filters, paginated)
//! POST   /api/recipes                        - Publish a recipe (auth)
//! GET    /api/recipes/download_shopping_cart - Shopping list PDF (auth)
//! GET    /api/recipes/{id}                   - Recipe detail
//! PATCH  /api/recipes/{id}                   - Edit own recipe (auth)
//! DELETE /api/recipes/{id}                   - Delete own recipe (auth)
//! POST   /api/recipes/{id}/favorite          - Add to favorites (auth)
//! DELETE /api/recipes/{id}/favorite          - Remove from favorites (auth)
//! POST   /api/recipes/{id}/shopping_cart     - Add to shopping cart (auth)
//! DELETE /api/recipes/{id}/shopping_cart     - Remove from shopping cart (auth)
//!
//! # Media
//! GET    /media/recipes/{id}/image           - Uploaded recipe image
//! ```

pub mod ingredients;
pub mod media;
pub mod pagination;
pub mod recipe_lists;
pub mod recipes;
pub mod shopping_list;
pub mod tags;
pub mod users;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the user and subscription routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/me", get(users::me))
        .route("/subscriptions", get(users::subscriptions))
        .route("/{id}", get(users::get_user))
        .route(
            "/{id}/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        )
}

/// Create the recipe routes router.
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::list_recipes).post(recipes::create_recipe))
        .route(
            "/download_shopping_cart",
            get(shopping_list::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(recipes::get_recipe)
                .patch(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route(
            "/{id}/favorite",
            post(recipe_lists::add_favorite).delete(recipe_lists::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            post(recipe_lists::add_to_cart).delete(recipe_lists::remove_from_cart),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/users", user_routes())
        .nest("/api/recipes", recipe_routes())
        .route("/api/tags", get(tags::list_tags))
        .route("/api/tags/{id}", get(tags::get_tag))
        .route("/api/ingredients", get(ingredients::list_ingredients))
        .route("/api/ingredients/{id}", get(ingredients::get_ingredient))
        .route("/media/recipes/{id}/image", get(media::recipe_image))
}
