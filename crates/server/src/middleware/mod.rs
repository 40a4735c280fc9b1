//! HTTP middleware for the Foodgram server.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, one hub per request)
//! 2. Trailing-slash normalization (`/api/tags/` routes like `/api/tags`)
//! 3. `TraceLayer` (request span with status and latency)
//! 4. Request ID (recorded on the span, echoed in the response)
//!
//! Authentication is not a layer: handlers opt in through the
//! [`RequireAuth`] and [`OptionalAuth`] extractors.

pub mod auth;
pub mod request_id;

pub use auth::{OptionalAuth, RequireAuth};
pub use request_id::request_id_middleware;
