//! Repository for the `comments` table.

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::contains_pattern;

use crate::models::comment::{Comment, CreateComment};

/// Columns selected from `comments c JOIN users u`.
const COLUMNS: &str = "c.id, c.review_id, c.author_id, u.username AS author, c.text, c.pub_date";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO comments (review_id, author_id, text)
                VALUES ($1, $2, $3)
                RETURNING *
             )
             SELECT {COLUMNS} FROM c JOIN users u ON u.id = c.author_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.review_id)
            .bind(input.author_id)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// List comments on a review, newest first, optionally filtered by a
    /// text or author-username substring.
    pub async fn list_for_review(
        pool: &PgPool,
        review_id: DbId,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.review_id = $1
               AND ($2::TEXT IS NULL OR c.text ILIKE $2 OR u.username ILIKE $2)
             ORDER BY c.pub_date DESC, c.id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .bind(search.map(contains_pattern))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_review(
        pool: &PgPool,
        review_id: DbId,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.review_id = $1
               AND ($2::TEXT IS NULL OR c.text ILIKE $2 OR u.username ILIKE $2)",
        )
        .bind(review_id)
        .bind(search.map(contains_pattern))
        .fetch_one(pool)
        .await
    }

    /// Find a comment by ID, scoped to its parent review.
    pub async fn find_in_review(
        pool: &PgPool,
        review_id: DbId,
        id: DbId,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.id = $1 AND c.review_id = $2"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(review_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a comment's text. `None` leaves it unchanged.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        text: Option<&str>,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                UPDATE comments SET text = COALESCE($2, text)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM c JOIN users u ON u.id = c.author_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(text)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
