//! Shopping list download.

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::shopping_list::ShoppingListService;
use crate::state::AppState;

/// `GET /api/recipes/download_shopping_cart`
///
/// Streams the aggregated cart as a PDF attachment. An empty cart still
/// downloads a valid document.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let document = ShoppingListService::new(state.pool(), state.font())
        .export(user.id)
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}
