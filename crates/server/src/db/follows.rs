//! Subscription (follow) repository.

use std::collections::HashSet;

use sqlx::PgPool;

use foodgram_core::UserId;

use super::users::{USER_COLUMNS, UserRow};
use super::{Page, PageRequest, RepositoryError};
use crate::models::User;

/// Repository for user-to-author subscriptions.
pub struct FollowRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FollowRepository<'a> {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Subscribe `user` to `author`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the subscription already exists.
    /// Returns `RepositoryError::Database` for other database errors,
    /// including the self-follow check constraint.
    pub async fn follow(&self, user: UserId, author: UserId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO foodgram.follow (user_id, author_id) VALUES ($1, $2)")
            .bind(user)
            .bind(author)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_unique(e, "already subscribed"))?;
        Ok(())
    }

    /// Remove a subscription. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unfollow(&self, user: UserId, author: UserId) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM foodgram.follow WHERE user_id = $1 AND author_id = $2")
                .bind(user)
                .bind(author)
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Which of `authors` the viewer is subscribed to.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn following_among(
        &self,
        viewer: UserId,
        authors: &[UserId],
    ) -> Result<HashSet<UserId>, RepositoryError> {
        if authors.is_empty() {
            return Ok(HashSet::new());
        }
        let raw: Vec<i32> = authors.iter().map(UserId::as_i32).collect();
        let rows: Vec<UserId> = sqlx::query_scalar(
            "SELECT author_id FROM foodgram.follow WHERE user_id = $1 AND author_id = ANY($2)",
        )
        .bind(viewer)
        .bind(raw)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Authors the user is subscribed to, most recently followed first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_followed(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, RepositoryError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM foodgram.follow WHERE user_id = $1")
                .bind(user)
                .fetch_one(self.pool)
                .await?;

        let sql = format!(
            r"
            SELECT {USER_COLUMNS}
            FROM foodgram.follow f
            JOIN foodgram.user u ON u.id = f.author_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC, u.id
            LIMIT $2 OFFSET $3
            "
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user)
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
