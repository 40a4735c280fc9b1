//! Tag reference data.

use axum::{
    Json,
    extract::{Path, State},
};

use foodgram_core::TagId;

use super::views::TagView;
use crate::db::TagRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /api/tags`
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagView>>> {
    let tags = TagRepository::new(state.pool()).list().await?;
    Ok(Json(tags.into_iter().map(TagView::from).collect()))
}

/// `GET /api/tags/{id}`
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<TagId>,
) -> Result<Json<TagView>> {
    TagRepository::new(state.pool())
        .get(id)
        .await?
        .map(|tag| Json(TagView::from(tag)))
        .ok_or_else(|| AppError::NotFound(format!("tag {id}")))
}
