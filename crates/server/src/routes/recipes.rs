//! Recipe listing, display and authoring.
//!
//! Clients write recipes with a [`RecipeForm`] and always read them back as a
//! [`RecipeDetail`]. [`RecipeResponse`] carries the detail together with the
//! action that produced it, which decides the status code.

use axum::{
    Json,
    extract::{OriginalUri, Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use foodgram_core::{RecipeId, Slug, UserId};

use super::pagination::{PageQuery, Paginated};
use super::views::RecipeDetail;
use crate::db::RecipeRepository;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::RecipeFilter;
use crate::services::recipes::{RecipeForm, RecipeService};
use crate::state::AppState;

/// A recipe detail, tagged with how it came to be returned.
#[derive(Debug)]
pub enum RecipeResponse {
    /// A new recipe was published (201).
    Created(RecipeDetail),
    /// An existing recipe was read (200).
    Shown(RecipeDetail),
    /// An existing recipe was overwritten (200).
    Updated(RecipeDetail),
}

impl IntoResponse for RecipeResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(detail) => (StatusCode::CREATED, Json(detail)).into_response(),
            Self::Shown(detail) | Self::Updated(detail) => Json(detail).into_response(),
        }
    }
}

/// Parsed query string of `GET /api/recipes`.
///
/// Parsed by hand because `tags` may repeat.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RecipeListQuery {
    pub page: PageQuery,
    pub author: Option<UserId>,
    pub tags: Vec<Slug>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeListQuery {
    /// Parse a raw query string. Unknown parameters are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` naming the first malformed parameter.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let mut query = Self::default();
        let invalid = |key: &str| AppError::BadRequest(format!("invalid value for {key}"));

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or("").as_bytes()) {
            match key.as_ref() {
                "page" => query.page.page = Some(value.parse().map_err(|_| invalid("page"))?),
                "limit" => query.page.limit = Some(value.parse().map_err(|_| invalid("limit"))?),
                "author" => {
                    let id: i32 = value.parse().map_err(|_| invalid("author"))?;
                    query.author = Some(UserId::new(id));
                }
                "tags" => query.tags.push(Slug::parse(&value).map_err(|_| invalid("tags"))?),
                "is_favorited" => {
                    query.is_favorited =
                        parse_flag(&value).ok_or_else(|| invalid("is_favorited"))?;
                }
                "is_in_shopping_cart" => {
                    query.is_in_shopping_cart =
                        parse_flag(&value).ok_or_else(|| invalid("is_in_shopping_cart"))?;
                }
                _ => {}
            }
        }
        Ok(query)
    }

    /// Repository filter for this query. The per-user flags only apply to
    /// authenticated viewers.
    #[must_use]
    pub fn filter(&self, viewer: Option<UserId>) -> RecipeFilter {
        RecipeFilter {
            author: self.author,
            tags: self.tags.clone(),
            favorited_by: viewer.filter(|_| self.is_favorited),
            in_cart_of: viewer.filter(|_| self.is_in_shopping_cart),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "True" => Some(true),
        "0" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// `GET /api/recipes`
#[instrument(skip(state, viewer, uri))]
pub async fn list_recipes(
    State(state): State<AppState>,
    viewer: OptionalAuth,
    OriginalUri(uri): OriginalUri,
    RawQuery(raw): RawQuery,
) -> Result<Json<Paginated<RecipeDetail>>> {
    let query = RecipeListQuery::parse(raw.as_deref())?;
    let window = query.page.window(state.config().page_size)?;
    let viewer = viewer.user_id();

    let page = RecipeRepository::new(state.pool())
        .list(&query.filter(viewer), window.request())
        .await?;

    let base_url = &state.config().base_url;
    let details = service(&state)
        .cards(viewer, page.items)
        .await?
        .into_iter()
        .map(|card| RecipeDetail::new(card, base_url))
        .collect();

    Ok(Json(Paginated::new(details, page.total, window, base_url, &uri)))
}

/// `GET /api/recipes/{id}`
#[instrument(skip(state, viewer))]
pub async fn get_recipe(
    State(state): State<AppState>,
    viewer: OptionalAuth,
    Path(id): Path<RecipeId>,
) -> Result<RecipeResponse> {
    let card = service(&state).card(viewer.user_id(), id).await?;
    Ok(RecipeResponse::Shown(RecipeDetail::new(
        card,
        &state.config().base_url,
    )))
}

/// `POST /api/recipes`
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn create_recipe(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<RecipeForm>,
) -> Result<RecipeResponse> {
    let service = service(&state);
    let recipe = service.create(user.id, &form).await?;
    let card = service.card(Some(user.id), recipe.id).await?;
    Ok(RecipeResponse::Created(RecipeDetail::new(
        card,
        &state.config().base_url,
    )))
}

/// `PATCH /api/recipes/{id}`
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn update_recipe(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
    Json(form): Json<RecipeForm>,
) -> Result<RecipeResponse> {
    let service = service(&state);
    service.update(user.id, id, &form).await?;
    let card = service.card(Some(user.id), id).await?;
    Ok(RecipeResponse::Updated(RecipeDetail::new(
        card,
        &state.config().base_url,
    )))
}

/// `DELETE /api/recipes/{id}`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode> {
    service(&state).delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn service(state: &AppState) -> RecipeService<'_> {
    RecipeService::new(state.pool(), state.config().max_image_bytes)
}
