//! User repository for database operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use foodgram_core::{Email, UserId, Username};

use super::{Page, PageRequest, RepositoryError};
use crate::models::user::{NewUser, User};

/// Row shape shared by every user query.
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            username,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
        })
    }
}

pub(crate) const USER_COLUMNS: &str = "u.id, u.email, u.username, u.first_name, u.last_name, u.created_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or username is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO foodgram.user AS u (email, username, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.email.as_str())
            .bind(user.username.as_str())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_unique(e, "email or username already exists"))?;

        row.try_into()
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM foodgram.user u WHERE u.id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Get a user by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM foodgram.user u WHERE u.username = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(username.as_str())
            .fetch_optional(self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Load several users at once, keyed by ID. Unknown IDs are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[UserId]) -> Result<HashMap<UserId, User>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let raw: Vec<i32> = ids.iter().map(UserId::as_i32).collect();
        let sql = format!("SELECT {USER_COLUMNS} FROM foodgram.user u WHERE u.id = ANY($1)");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(raw)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter()
            .map(|row| User::try_from(row).map(|user| (user.id, user)))
            .collect()
    }

    /// List users ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, page: PageRequest) -> Result<Page<User>, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM foodgram.user")
            .fetch_one(self.pool)
            .await?;

        let sql = format!(
            "SELECT {USER_COLUMNS} FROM foodgram.user u ORDER BY u.id LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page { items, total })
    }
}
