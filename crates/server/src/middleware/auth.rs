//! Token authentication extractors.
//!
//! Clients send `Authorization: Token <key>` (or `Bearer <key>`). Keys are
//! issued by `fg-cli user token` and looked up by their SHA-256 digest.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use tracing::Span;

use crate::db::TokenRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires an authenticated user.
///
/// Rejects with 401 when no token is sent or the token is unknown.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Extractor that optionally resolves the current user.
///
/// Anonymous requests get `None`. A token that is sent but unknown is still
/// rejected with 401, so clients notice revoked keys.
pub struct OptionalAuth(pub Option<User>);

impl OptionalAuth {
    /// ID of the viewer, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<foodgram_core::UserId> {
        self.0.as_ref().map(|user| user.id)
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(&parts.headers, state)
            .await?
            .map(Self)
            .ok_or_else(|| {
                AppError::Unauthorized("authentication credentials were not provided".to_string())
            })
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_user(&parts.headers, state).await?))
    }
}

async fn resolve_user(headers: &HeaderMap, state: &AppState) -> Result<Option<User>, AppError> {
    let Some(raw) = token_from_headers(headers)? else {
        return Ok(None);
    };

    let user = TokenRepository::new(state.pool())
        .resolve(raw)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid token".to_string()))?;

    Span::current().record("user_id", user.id.as_i32());
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Some(user))
}

/// Extract the raw token from the `Authorization` header.
///
/// Returns `Ok(None)` when the header is absent.
fn token_from_headers(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let malformed = || AppError::Unauthorized("malformed Authorization header".to_string());

    let value = value.to_str().map_err(|_| malformed())?;
    let (scheme, token) = value.trim().split_once(' ').ok_or_else(malformed)?;
    let token = token.trim();

    let known_scheme =
        scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer");
    if !known_scheme || token.is_empty() {
        return Err(malformed());
    }
    Ok(Some(token))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_absent_header_is_anonymous() {
        assert!(token_from_headers(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn test_accepts_token_and_bearer_schemes() {
        assert_eq!(
            token_from_headers(&headers("Token abc123")).unwrap(),
            Some("abc123")
        );
        assert_eq!(
            token_from_headers(&headers("bearer  abc123 ")).unwrap(),
            Some("abc123")
        );
    }

    #[test]
    fn test_rejects_malformed_headers() {
        assert!(token_from_headers(&headers("abc123")).is_err());
        assert!(token_from_headers(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(token_from_headers(&headers("Token ")).is_err());
    }
}
