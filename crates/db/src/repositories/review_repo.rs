//! Repository for the `reviews` table.
//!
//! Every read joins `users` so rows carry the author's username.

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::contains_pattern;

use crate::models::review::{CreateReview, Review, UpdateReview};

/// Columns selected from `reviews r JOIN users u`.
const COLUMNS: &str = "r.id, r.title_id, r.author_id, u.username AS author, r.text, r.score, r.pub_date";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review, returning it with the author's username.
    ///
    /// A second review by the same author on the same title violates
    /// `uq_reviews_author_title`.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "WITH r AS (
                INSERT INTO reviews (title_id, author_id, text, score)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {COLUMNS} FROM r JOIN users u ON u.id = r.author_id"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.title_id)
            .bind(input.author_id)
            .bind(&input.text)
            .bind(input.score)
            .fetch_one(pool)
            .await
    }

    /// Whether `author_id` has already reviewed `title_id`.
    pub async fn exists_for_author(
        pool: &PgPool,
        title_id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(pool)
        .await
    }

    /// List reviews of a title, newest first.
    ///
    /// `search` matches a substring of the text or the author's username,
    /// case-insensitively.
    pub async fn list_for_title(
        pool: &PgPool,
        title_id: DbId,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews r JOIN users u ON u.id = r.author_id
             WHERE r.title_id = $1
               AND ($2::TEXT IS NULL OR r.text ILIKE $2 OR u.username ILIKE $2)
             ORDER BY r.pub_date DESC, r.id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(search.map(contains_pattern))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_title(
        pool: &PgPool,
        title_id: DbId,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM reviews r JOIN users u ON u.id = r.author_id
             WHERE r.title_id = $1
               AND ($2::TEXT IS NULL OR r.text ILIKE $2 OR u.username ILIKE $2)",
        )
        .bind(title_id)
        .bind(search.map(contains_pattern))
        .fetch_one(pool)
        .await
    }

    /// Find a review by ID, scoped to the title it must belong to.
    pub async fn find_in_title(
        pool: &PgPool,
        title_id: DbId,
        id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews r JOIN users u ON u.id = r.author_id
             WHERE r.id = $1 AND r.title_id = $2"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(title_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a review. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "WITH r AS (
                UPDATE reviews SET
                    text = COALESCE($2, text),
                    score = COALESCE($3, score)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM r JOIN users u ON u.id = r.author_id"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(&input.text)
            .bind(input.score)
            .fetch_optional(pool)
            .await
    }

    /// Delete a review. Its comments cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
