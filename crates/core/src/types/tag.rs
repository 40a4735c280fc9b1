//! Tag attribute types: URL slug and hex display color.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing tag attributes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("slug must be 1-{max} characters of a-z, 0-9, - or _")]
    InvalidSlug { max: usize },
    #[error("color must be a #RRGGBB hex value (got {0:?})")]
    InvalidColor(String),
}

/// URL-safe tag identifier, used by the `tags` recipe filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub const MAX_LENGTH: usize = 200;

    /// Parse a `Slug`.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidSlug`] for empty, overlong or non-slug input.
    pub fn parse(s: &str) -> Result<Self, TagError> {
        let valid = !s.is_empty()
            && s.len() <= Self::MAX_LENGTH
            && s
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(TagError::InvalidSlug {
                max: Self::MAX_LENGTH,
            })
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

/// A `#RRGGBB` color, stored uppercase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse a `HexColor`, accepting either case.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidColor`] unless the input is `#` followed by
    /// exactly six hex digits.
    pub fn parse(s: &str) -> Result<Self, TagError> {
        match s.strip_prefix('#') {
            Some(hex) if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                Ok(Self(format!("#{}", hex.to_ascii_uppercase())))
            }
            _ => Err(TagError::InvalidColor(s.to_owned())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for HexColor {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert!(Slug::parse("breakfast").is_ok());
        assert!(Slug::parse("late_night-2").is_ok());
        assert!(Slug::parse("").is_err());
        assert!(Slug::parse("Breakfast").is_err());
        assert!(Slug::parse("two words").is_err());
    }

    #[test]
    fn test_color_normalizes_case() {
        assert_eq!(HexColor::parse("#e26c2d").unwrap().as_str(), "#E26C2D");
    }

    #[test]
    fn test_color_rejects_malformed() {
        assert!(HexColor::parse("E26C2D").is_err());
        assert!(HexColor::parse("#E26C2").is_err());
        assert!(HexColor::parse("#GGGGGG").is_err());
    }
}
