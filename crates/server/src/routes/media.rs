//! Uploaded recipe images.

use axum::{
    extract::{Path, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use foodgram_core::RecipeId;

use crate::db::RecipeRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /media/recipes/{id}/image`
pub async fn recipe_image(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<Response> {
    let image = RecipeRepository::new(state.pool())
        .image(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("image for recipe {id}")))?;

    Ok((
        [
            (CONTENT_TYPE, image.content_type),
            (CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        image.bytes,
    )
        .into_response())
}
