//! User profiles and subscriptions.

use axum::{
    Json,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use foodgram_core::UserId;

use super::pagination::{PageQuery, Paginated};
use super::views::{RecipeSummaryView, SubscriptionView, UserView};
use crate::db::{FollowRepository, RecipeRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::User;
use crate::state::AppState;

/// Query parameters of the subscription endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Cap on the recipes previewed per author.
    pub recipes_limit: Option<u32>,
}

/// `GET /api/users`
#[instrument(skip(state, viewer, uri))]
pub async fn list_users(
    State(state): State<AppState>,
    viewer: OptionalAuth,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<UserView>>> {
    let window = query.window(state.config().page_size)?;
    let page = UserRepository::new(state.pool())
        .list(window.request())
        .await?;

    let ids: Vec<UserId> = page.items.iter().map(|u| u.id).collect();
    let followed = match viewer.user_id() {
        Some(viewer) => {
            FollowRepository::new(state.pool())
                .following_among(viewer, &ids)
                .await?
        }
        None => Default::default(),
    };

    let page = page.map(|user| {
        let is_subscribed = followed.contains(&user.id);
        UserView::new(user, is_subscribed)
    });
    Ok(Json(Paginated::new(
        page.items,
        page.total,
        window,
        &state.config().base_url,
        &uri,
    )))
}

/// `GET /api/users/{id}`
#[instrument(skip(state, viewer))]
pub async fn get_user(
    State(state): State<AppState>,
    viewer: OptionalAuth,
    Path(id): Path<UserId>,
) -> Result<Json<UserView>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    let is_subscribed = match viewer.user_id() {
        Some(viewer) => FollowRepository::new(state.pool())
            .following_among(viewer, &[id])
            .await?
            .contains(&id),
        None => false,
    };

    Ok(Json(UserView::new(user, is_subscribed)))
}

/// `GET /api/users/me`
pub async fn me(RequireAuth(user): RequireAuth) -> Json<UserView> {
    Json(UserView::new(user, false))
}

/// `POST /api/users/{id}/subscribe`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn subscribe(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(author_id): Path<UserId>,
    Query(query): Query<SubscriptionQuery>,
) -> Result<(StatusCode, Json<SubscriptionView>)> {
    if author_id == user.id {
        return Err(AppError::BadRequest("cannot subscribe to yourself".to_string()));
    }
    let author = UserRepository::new(state.pool())
        .get_by_id(author_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {author_id}")))?;

    FollowRepository::new(state.pool())
        .follow(user.id, author_id)
        .await?;
    tracing::info!(author_id = %author_id, "Subscribed");

    let view = subscription_views(&state, vec![author], query.recipes_limit)
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("subscription view missing".to_string()))?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `DELETE /api/users/{id}/subscribe`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn unsubscribe(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(author_id): Path<UserId>,
) -> Result<StatusCode> {
    if UserRepository::new(state.pool())
        .get_by_id(author_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!("user {author_id}")));
    }

    if FollowRepository::new(state.pool())
        .unfollow(user.id, author_id)
        .await?
    {
        tracing::info!(author_id = %author_id, "Unsubscribed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::BadRequest("not subscribed to this user".to_string()))
    }
}

/// `GET /api/users/subscriptions`
#[instrument(skip(state, user, uri), fields(user_id = %user.id))]
pub async fn subscriptions(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<SubscriptionQuery>,
) -> Result<Json<Paginated<SubscriptionView>>> {
    let window = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .window(state.config().page_size)?;

    let page = FollowRepository::new(state.pool())
        .list_followed(user.id, window.request())
        .await?;
    let views = subscription_views(&state, page.items, query.recipes_limit).await?;

    Ok(Json(Paginated::new(
        views,
        page.total,
        window,
        &state.config().base_url,
        &uri,
    )))
}

/// Build subscription views for authors the viewer follows.
async fn subscription_views(
    state: &AppState,
    authors: Vec<User>,
    recipes_limit: Option<u32>,
) -> Result<Vec<SubscriptionView>> {
    let ids: Vec<UserId> = authors.iter().map(|a| a.id).collect();
    let recipes = RecipeRepository::new(state.pool());
    let mut previews = recipes
        .recent_by_authors(&ids, recipes_limit.map(i64::from))
        .await?;
    let counts = recipes.count_by_authors(&ids).await?;
    let base_url = &state.config().base_url;

    Ok(authors
        .into_iter()
        .map(|author| SubscriptionView {
            recipes: previews
                .remove(&author.id)
                .unwrap_or_default()
                .into_iter()
                .map(|recipe| RecipeSummaryView::new(recipe, base_url))
                .collect(),
            recipes_count: counts.get(&author.id).copied().unwrap_or(0),
            user: UserView::new(author, true),
        })
        .collect())
}
