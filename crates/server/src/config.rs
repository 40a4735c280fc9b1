//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FOODGRAM_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! ## Optional
//! - `FOODGRAM_HOST` - Bind address (default: 127.0.0.1)
//! - `FOODGRAM_PORT` - Listen port (default: 8000)
//! - `FOODGRAM_BASE_URL` - Public URL used in links (default: <http://localhost:8000>)
//! - `FOODGRAM_PAGE_SIZE` - Default page size for listings (default: 6)
//! - `FOODGRAM_FONT_PATH` - TrueType font for the shopping list export
//!   (default: the bundled DejaVu Sans)
//! - `FOODGRAM_MAX_IMAGE_BYTES` - Largest accepted recipe image (default: 5 MiB)
//! - `FOODGRAM_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct FoodgramConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used for pagination links and image URLs
    pub base_url: Url,
    /// Default page size when a request gives no `limit`
    pub page_size: u32,
    /// TrueType font overriding the bundled one in shopping list exports
    pub font_path: Option<PathBuf>,
    /// Largest decoded recipe image, in bytes
    pub max_image_bytes: usize,
    /// Emit JSON logs instead of human-readable text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl FoodgramConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("FOODGRAM_DATABASE_URL")?;
        let host = parse_env("FOODGRAM_HOST", "127.0.0.1")?;
        let port = parse_env("FOODGRAM_PORT", "8000")?;
        let base_url = parse_env("FOODGRAM_BASE_URL", "http://localhost:8000")?;

        let page_size: u32 = parse_env("FOODGRAM_PAGE_SIZE", "6")?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidEnvVar(
                "FOODGRAM_PAGE_SIZE".to_string(),
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        let font_path = get_optional_env("FOODGRAM_FONT_PATH").map(PathBuf::from);
        let max_image_bytes = parse_env("FOODGRAM_MAX_IMAGE_BYTES", "5242880")?;
        let log_json = get_optional_env("FOODGRAM_LOG_JSON").is_some_and(|v| is_truthy(&v));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            page_size,
            font_path,
            max_image_bytes,
            log_json,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional, non-empty environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_reports_variable() {
        let err = parse_value::<u16>("FOODGRAM_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "FOODGRAM_PORT"));
        assert_eq!(parse_value::<u16>("FOODGRAM_PORT", " 8000 ").unwrap(), 8000);
    }

    #[test]
    fn test_parse_value_base_url() {
        let url: Url = parse_value("FOODGRAM_BASE_URL", "https://foodgram.example").unwrap();
        assert_eq!(url.as_str(), "https://foodgram.example/");
        assert!(parse_value::<Url>("FOODGRAM_BASE_URL", "not a url").is_err());
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
    }

    #[test]
    fn test_socket_addr() {
        let config = FoodgramConfig {
            database_url: SecretString::from("postgres://localhost/test"),
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

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = FoodgramConfig {
            database_url: SecretString::from("postgres://user:hunter2@db/foodgram"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            base_url: Url::parse("http://localhost:8000").unwrap(),
            page_size: 6,
            font_path: Some(PathBuf::from("font.ttf")),
            max_image_bytes: 1024,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
