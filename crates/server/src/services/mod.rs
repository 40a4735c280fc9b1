//! Business logic services for the Foodgram server.
//!
//! # Services
//!
//! - `images` - Decoding of `data:` URL recipe images
//! - `recipes` - Recipe form validation, writes and display assembly
//! - `shopping_list` - Cart aggregation and PDF export

pub mod images;
pub mod recipes;
pub mod shopping_list;
