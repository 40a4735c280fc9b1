//! Tag domain type.

use foodgram_core::{HexColor, Slug, TagId};

/// A recipe tag such as "breakfast".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: Option<HexColor>,
    pub slug: Slug,
}
