//! Unified error handling with Sentry integration.
//!
//! All route handlers return `Result<T, AppError>`. Server errors are
//! captured to Sentry before the response is written; clients always get a
//! JSON body of the form `{"error": "..."}` with internal details hidden.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::recipes::RecipeError;
use crate::services::shopping_list::ExportError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Recipe validation or write failed.
    #[error("Recipe error: {0}")]
    Recipe(#[from] RecipeError),

    /// Shopping list export failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

const INTERNAL_MESSAGE: &str = "Internal server error";

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::Conflict(_) => StatusCode::BAD_REQUEST,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn repository_message(err: &RepositoryError) -> String {
    match err {
        RepositoryError::Conflict(msg) => msg.clone(),
        RepositoryError::NotFound => "not found".to_string(),
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            INTERNAL_MESSAGE.to_string()
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => repository_status(err),
            Self::Recipe(err) => match err {
                RecipeError::NotFound => StatusCode::NOT_FOUND,
                RecipeError::NotAuthor => StatusCode::FORBIDDEN,
                RecipeError::Repository(err) => repository_status(err),
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Export(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to clients.
    fn public_message(&self) -> String {
        match self {
            Self::Database(err) | Self::Recipe(RecipeError::Repository(err)) => {
                repository_message(err)
            }
            Self::Recipe(err) => err.to_string(),
            Self::Export(_) | Self::Internal(_) => INTERNAL_MESSAGE.to_string(),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the current request.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;
    use crate::services::shopping_list::RenderError;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("recipe 7".to_string());
        assert_eq!(err.to_string(), "Not found: recipe 7");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::NotFound("x".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("x".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(RepositoryError::Conflict("dup".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(RecipeError::NotAuthor).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(RecipeError::EmptyTags).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_render_failure_hides_details() {
        let err = AppError::from(ExportError::from(RenderError::Font(
            "bad table at /opt/fonts".to_string(),
        )));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_client_errors_are_json() {
        let (status, body) = body_json(AppError::BadRequest("cannot follow yourself".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "cannot follow yourself");
    }
}
