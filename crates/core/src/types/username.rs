//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    #[error("username cannot be empty")]
    Empty,
    #[error("username must be at most {max} characters")]
    TooLong { max: usize },
    #[error("username may only contain letters, digits and . @ + - _ (found {0:?})")]
    InvalidChar(char),
    #[error("\"me\" is reserved and cannot be used as a username")]
    Reserved,
}

/// A public handle for a user.
///
/// Letters and digits from any script are allowed, plus `_ . @ + -`.
/// `me` (any case) is reserved because `/api/users/me` addresses the
/// requesting user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Maximum length of a username in characters.
    pub const MAX_LENGTH: usize = 150;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns a [`UsernameError`] if the input is empty, too long, contains a
    /// character outside the allowed set, or is reserved.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-')))
        {
            return Err(UsernameError::InvalidChar(bad));
        }
        if s.eq_ignore_ascii_case("me") {
            return Err(UsernameError::Reserved);
        }
        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_characters() {
        assert!(Username::parse("chef_anna").is_ok());
        assert!(Username::parse("anna.k+cooking@home-1").is_ok());
        assert!(Username::parse("повар").is_ok());
    }

    #[test]
    fn test_rejects_disallowed_characters() {
        assert_eq!(
            Username::parse("chef anna"),
            Err(UsernameError::InvalidChar(' '))
        );
        assert_eq!(
            Username::parse("chef/anna"),
            Err(UsernameError::InvalidChar('/'))
        );
    }

    #[test]
    fn test_rejects_reserved() {
        assert_eq!(Username::parse("me"), Err(UsernameError::Reserved));
        assert_eq!(Username::parse("ME"), Err(UsernameError::Reserved));
        assert!(Username::parse("meal").is_ok());
    }

    #[test]
    fn test_length_limits() {
        assert_eq!(Username::parse(""), Err(UsernameError::Empty));
        assert!(Username::parse(&"a".repeat(150)).is_ok());
        assert!(matches!(
            Username::parse(&"a".repeat(151)),
            Err(UsernameError::TooLong { .. })
        ));
    }
}
