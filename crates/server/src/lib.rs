//! Foodgram server library.
//!
//! Recipe publishing API with favorites, subscriptions and a shopping cart
//! that exports as an aggregated PDF shopping list. The binary in `main.rs`
//! only wires configuration, logging and the listener around [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the full application: routes, middleware and trailing-slash
/// normalization.
///
/// Serve it with `ServiceExt::<Request>::into_make_service`, since the
/// normalization layer has to see the path before routing.
pub fn app(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header::AUTHORIZATION};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::FoodgramConfig;
    use crate::middleware::request_id::REQUEST_ID_HEADER;
    use crate::services::shopping_list::FontFile;

    /// App backed by a pool that never connects. Only routes that fail
    /// before touching the database can be exercised.
    fn offline_app() -> NormalizePath<Router> {
        let config = FoodgramConfig {
            database_url: SecretString::from("postgres://localhost:1/unreachable"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            base_url: Url::parse("http://localhost:8000").unwrap(),
            page_size: 6,
            font_path: None,
            max_image_bytes: 1024,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unreachable")
            .unwrap();
        app(AppState::new(config, pool, FontFile::bundled()))
    }

    async fn get(uri: &str, authorization: Option<&str>) -> axum::response::Response {
        let mut request = Request::builder().uri(uri);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        offline_app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let response = get("/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_trailing_slash_is_normalized() {
        let response = get("/health/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_download_requires_token() {
        let response = get("/api/recipes/download_shopping_cart", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_authorization_is_rejected() {
        let response = get("/api/users/me", Some("Basic dXNlcjpwYXNz")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = get("/api/nothing-here", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
