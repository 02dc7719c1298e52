//! Repository for the `categories` and `genres` tables.
//!
//! Both tables have the same shape, so every method takes a [`Taxonomy`]
//! selecting which one to address. The table name is interpolated from a
//! closed enum, never from user input.

use sqlx::PgPool;

use crate::contains_pattern;
use crate::models::taxonomy::{CreateTaxon, Taxon, Taxonomy, UpdateTaxon};

const COLUMNS: &str = "id, name, slug";

/// Provides CRUD operations for categories and genres.
pub struct TaxonomyRepo;

impl TaxonomyRepo {
    /// Insert a new category or genre, returning the created row.
    pub async fn create(
        pool: &PgPool,
        kind: Taxonomy,
        input: &CreateTaxon,
    ) -> Result<Taxon, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// List rows ordered by name, optionally filtered by a name substring.
    pub async fn list(
        pool: &PgPool,
        kind: Taxonomy,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Taxon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table}
             WHERE ($1::TEXT IS NULL OR name ILIKE $1)
             ORDER BY name, id
             LIMIT $2 OFFSET $3",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(search.map(contains_pattern))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count rows matching the same filter as [`TaxonomyRepo::list`].
    pub async fn count(
        pool: &PgPool,
        kind: Taxonomy,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM {table} WHERE ($1::TEXT IS NULL OR name ILIKE $1)",
            table = kind.table()
        );
        sqlx::query_scalar(&query)
            .bind(search.map(contains_pattern))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        kind: Taxonomy,
        slug: &str,
    ) -> Result<Option<Taxon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} WHERE slug = $1",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Resolve several slugs at once. Unknown slugs are simply absent from
    /// the result, so callers check each requested slug for membership.
    pub async fn find_by_slugs(
        pool: &PgPool,
        kind: Taxonomy,
        slugs: &[String],
    ) -> Result<Vec<Taxon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} WHERE slug = ANY($1) ORDER BY name",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(slugs)
            .fetch_all(pool)
            .await
    }

    /// Update a row addressed by slug. Only non-`None` fields are applied.
    ///
    /// Returns `None` if the slug does not exist.
    pub async fn update_by_slug(
        pool: &PgPool,
        kind: Taxonomy,
        slug: &str,
        input: &UpdateTaxon,
    ) -> Result<Option<Taxon>, sqlx::Error> {
        let query = format!(
            "UPDATE {table} SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug)
             WHERE slug = $1
             RETURNING {COLUMNS}",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(slug)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_optional(pool)
            .await
    }

    /// Delete a row by slug. Titles in a deleted category keep existing with
    /// no category; genre links are removed.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_by_slug(
        pool: &PgPool,
        kind: Taxonomy,
        slug: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {table} WHERE slug = $1", table = kind.table());
        let result = sqlx::query(&query).bind(slug).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
