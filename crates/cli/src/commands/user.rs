//! User and API token management.
//!
//! # Usage
//!
//! ```bash
//! # Create a user
//! fg-cli user create -e anna@example.com -u anna -f Anna -l Ivanova
//!
//! # Issue a token (printed once, only its hash is stored)
//! fg-cli user token -u anna
//!
//! # Replace all of a user's tokens with a fresh one
//! fg-cli user token -u anna --revoke
//! ```

use foodgram_core::{Email, EmailError, UserId, Username, UsernameError};
use foodgram_server::db::{RepositoryError, TokenRepository, UserRepository};
use foodgram_server::models::NewUser;

use super::ConnectError;

/// Errors that can occur during user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("No user named {0}")]
    UnknownUser(String),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Validate the arguments of `user create` without touching the database.
pub fn new_user(
    email: &str,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> Result<NewUser, UserError> {
    let email = Email::parse(email)?;
    let username = Username::parse(username)?;
    NewUser::new(email, username, first_name, last_name).map_err(UserError::InvalidName)
}

/// Create a new user.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create(
    email: &str,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> Result<UserId, UserError> {
    let new_user = new_user(email, username, first_name, last_name)?;

    let pool = super::connect().await?;
    tracing::info!("Creating user: {}", new_user.username);
    let user = UserRepository::new(&pool).create(&new_user).await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}",
        user.id,
        user.username
    );
    Ok(user.id)
}

/// Issue an API token for `username`, optionally revoking existing ones.
pub async fn issue_token(username: &str, revoke: bool) -> Result<(), UserError> {
    let parsed = Username::parse(username)?;

    let pool = super::connect().await?;
    let user = UserRepository::new(&pool)
        .get_by_username(&parsed)
        .await?
        .ok_or_else(|| UserError::UnknownUser(username.to_owned()))?;

    let tokens = TokenRepository::new(&pool);
    if revoke {
        let revoked = tokens.revoke_all(user.id).await?;
        tracing::info!(revoked, "Existing tokens revoked");
    }
    let token = tokens.issue(user.id).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Token for {}: {token}", user.username);
        println!("Send it as `Authorization: Token {token}`. It cannot be shown again.");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_validates_every_field() {
        assert!(new_user("anna@example.com", "anna", "Anna", "Ivanova").is_ok());
        assert!(matches!(
            new_user("not-an-email", "anna", "Anna", "Ivanova"),
            Err(UserError::InvalidEmail(_))
        ));
        assert!(matches!(
            new_user("anna@example.com", "me", "Anna", "Ivanova"),
            Err(UserError::InvalidUsername(_))
        ));
        assert!(matches!(
            new_user("anna@example.com", "anna", "  ", "Ivanova"),
            Err(UserError::InvalidName(_))
        ));
    }
}
