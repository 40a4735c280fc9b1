//! Ingredient reference data.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use foodgram_core::IngredientId;

use super::views::IngredientView;
use crate::db::IngredientRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

/// `GET /api/ingredients`
#[instrument(skip(state))]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> Result<Json<Vec<IngredientView>>> {
    let prefix = query.name.as_deref().map_or("", str::trim);
    let ingredients = IngredientRepository::new(state.pool())
        .search(prefix)
        .await?;
    Ok(Json(ingredients.into_iter().map(IngredientView::from).collect()))
}

/// `GET /api/ingredients/{id}`
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<IngredientId>,
) -> Result<Json<IngredientView>> {
    IngredientRepository::new(state.pool())
        .get(id)
        .await?
        .map(|ingredient| Json(IngredientView::from(ingredient)))
        .ok_or_else(|| AppError::NotFound(format!("ingredient {id}")))
}
