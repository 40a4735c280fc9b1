//! Favorites and shopping cart membership.
//!
//! Both endpoint pairs behave identically: POST adds (201 with the short
//! recipe view, 400 if already listed), DELETE removes (204, 400 if not
//! listed). Unknown recipes are 404 either way.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use foodgram_core::RecipeId;

use super::views::RecipeSummaryView;
use crate::db::{RecipeList, RecipeListRepository, RecipeRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Recipe, User};
use crate::state::AppState;

/// `POST /api/recipes/{id}/favorite`
pub async fn add_favorite(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<(StatusCode, Json<RecipeSummaryView>)> {
    add(&state, &user, id, RecipeList::Favorites).await
}

/// `DELETE /api/recipes/{id}/favorite`
pub async fn remove_favorite(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode> {
    remove(&state, &user, id, RecipeList::Favorites).await
}

/// `POST /api/recipes/{id}/shopping_cart`
pub async fn add_to_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<(StatusCode, Json<RecipeSummaryView>)> {
    add(&state, &user, id, RecipeList::ShoppingCart).await
}

/// `DELETE /api/recipes/{id}/shopping_cart`
pub async fn remove_from_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode> {
    remove(&state, &user, id, RecipeList::ShoppingCart).await
}

async fn existing_recipe(state: &AppState, id: RecipeId) -> Result<Recipe> {
    RecipeRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
async fn add(
    state: &AppState,
    user: &User,
    id: RecipeId,
    list: RecipeList,
) -> Result<(StatusCode, Json<RecipeSummaryView>)> {
    let recipe = existing_recipe(state, id).await?;
    RecipeListRepository::new(state.pool(), list)
        .add(user.id, id)
        .await?;
    tracing::info!(list = list.label(), "Recipe added");

    Ok((
        StatusCode::CREATED,
        Json(RecipeSummaryView::new(recipe, &state.config().base_url)),
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
async fn remove(state: &AppState, user: &User, id: RecipeId, list: RecipeList) -> Result<StatusCode> {
    existing_recipe(state, id).await?;
    if RecipeListRepository::new(state.pool(), list)
        .remove(user.id, id)
        .await?
    {
        tracing::info!(list = list.label(), "Recipe removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::BadRequest(format!(
            "recipe is not in {}",
            list.label()
        )))
    }
}
