//! Foodgram Core - Shared domain types.
//!
//! This crate provides the validated types used across all Foodgram components:
//! - `server` - The JSON API and shopping list export
//! - `cli` - Migrations, reference data loading, user and token management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. Parsing a value through one of these types is the only way to
//! construct it, so anything holding an [`Amount`] or a [`Username`] has
//! already been validated.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, usernames, quantities, tags

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
