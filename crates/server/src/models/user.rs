//! User domain types.

use chrono::{DateTime, Utc};

use foodgram_core::{Email, UserId, Username};

/// A registered user (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Contact address, unique across users.
    pub email: Email,
    /// Public handle, unique across users.
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    /// Maximum length of first and last names.
    pub const MAX_NAME_LENGTH: usize = 150;

    /// Build a `NewUser`, validating name lengths.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending field when a name is empty or
    /// longer than [`Self::MAX_NAME_LENGTH`].
    pub fn new(
        email: Email,
        username: Username,
        first_name: &str,
        last_name: &str,
    ) -> Result<Self, String> {
        for (field, value) in [("first_name", first_name), ("last_name", last_name)] {
            let len = value.trim().chars().count();
            if len == 0 || len > Self::MAX_NAME_LENGTH {
                return Err(format!(
                    "{field} must be 1-{} characters",
                    Self::MAX_NAME_LENGTH
                ));
            }
        }
        Ok(Self {
            email,
            username,
            first_name: first_name.trim().to_owned(),
            last_name: last_name.trim().to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parts() -> (Email, Username) {
        (
            Email::parse("anna@example.com").unwrap(),
            Username::parse("anna").unwrap(),
        )
    }

    #[test]
    fn test_new_user_trims_names() {
        let (email, username) = parts();
        let user = NewUser::new(email, username, " Anna ", "Karenina").unwrap();
        assert_eq!(user.first_name, "Anna");
    }

    #[test]
    fn test_new_user_rejects_blank_or_long_names() {
        let (email, username) = parts();
        let err = NewUser::new(email.clone(), username.clone(), "  ", "K").unwrap_err();
        assert!(err.contains("first_name"));
        let err = NewUser::new(email, username, "Anna", &"k".repeat(151)).unwrap_err();
        assert!(err.contains("last_name"));
    }
}
