//! API token repository.
//!
//! Raw tokens are shown once at issue time. Only their SHA-256 digest is
//! stored, so a leaked table cannot be replayed against the API.

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use foodgram_core::UserId;

use super::RepositoryError;
use super::users::{USER_COLUMNS, UserRow};
use crate::models::User;

/// Random bytes per token; the raw token is their hex encoding.
const TOKEN_BYTES: usize = 20;

/// Hex-encode bytes as lowercase.
fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Digest under which a raw token is stored.
#[must_use]
pub fn hash_token(raw: &str) -> String {
    to_hex(&Sha256::digest(raw.as_bytes()))
}

/// Repository for API token operations.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Issue a fresh token for a user and return the raw value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn issue(&self, user_id: UserId) -> Result<String, RepositoryError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill(&mut bytes);
        let raw = to_hex(&bytes);

        sqlx::query("INSERT INTO foodgram.auth_token (token_hash, user_id) VALUES ($1, $2)")
            .bind(hash_token(&raw))
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    RepositoryError::NotFound
                }
                other => RepositoryError::Database(other),
            })?;

        Ok(raw)
    }

    /// Resolve a raw token to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn resolve(&self, raw: &str) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {USER_COLUMNS}
            FROM foodgram.auth_token t
            JOIN foodgram.user u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(hash_token(raw))
            .fetch_optional(self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Revoke every token of a user. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revoke_all(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM foodgram.auth_token WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let digest = hash_token("abc");
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash_token("abc"), digest);
    }

    #[test]
    fn test_hash_token_differs_per_input() {
        assert_ne!(hash_token("token-a"), hash_token("token-b"));
    }

    #[test]
    fn test_to_hex_pads_bytes() {
        assert_eq!(to_hex(&[0x00, 0x0f, 0xff]), "000fff");
    }
}
