//! Repository for the `titles` and `genre_titles` tables.
//!
//! Ratings are never stored: every read aggregates `AVG(reviews.score)`.

use std::collections::HashMap;

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::contains_pattern;
use crate::models::taxonomy::Taxon;
use crate::models::title::{
    CreateTitle, Title, TitleDetail, TitleFilter, TitleGenreRow, TitleRatingRow, UpdateTitle,
};

const COLUMNS: &str = "id, name, year, description, category_id";

/// Title columns joined with category and the aggregated rating.
/// Must be followed by a `WHERE` clause and `GROUP BY t.id, c.id`.
const RATED_SELECT: &str = "SELECT t.id, t.name, t.year, t.description, \
                            AVG(r.score)::FLOAT8 AS rating, t.category_id, \
                            c.name AS category_name, c.slug AS category_slug \
                            FROM titles t \
                            LEFT JOIN categories c ON c.id = t.category_id \
                            LEFT JOIN reviews r ON r.title_id = t.id";

/// Filter predicate shared by `list` and `count`. Binds `$1..$4`.
const FILTER_WHERE: &str = "WHERE ($1::TEXT IS NULL OR c.slug = $1)
      AND ($2::TEXT IS NULL OR EXISTS (
            SELECT 1 FROM genre_titles gt
            JOIN genres g ON g.id = gt.genre_id
            WHERE gt.title_id = t.id AND g.slug = $2))
      AND ($3::TEXT IS NULL OR t.name ILIKE $3)
      AND ($4::INTEGER IS NULL OR t.year = $4)";

/// Provides CRUD operations and rated listings for titles.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateTitle) -> Result<Title, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let title = sqlx::query_as::<_, Title>(&query)
            .bind(&input.name)
            .bind(input.year)
            .bind(&input.description)
            .bind(input.category_id)
            .fetch_one(&mut *tx)
            .await?;

        link_genres(&mut tx, title.id, &input.genre_ids).await?;

        tx.commit().await?;
        Ok(title)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Title>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM titles WHERE id = $1");
        sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load the API representation of a single title.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<TitleDetail>, sqlx::Error> {
        let query = format!("{RATED_SELECT} WHERE t.id = $1 GROUP BY t.id, c.id");
        let row = sqlx::query_as::<_, TitleRatingRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let genre = Self::genres_for_titles(pool, &[row.id])
            .await?
            .into_iter()
            .map(taxon_from_link)
            .collect();
        Ok(Some(TitleDetail::from_row(row, genre)))
    }

    /// List titles ordered by rating (unrated last), then name.
    pub async fn list(
        pool: &PgPool,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TitleDetail>, sqlx::Error> {
        let query = format!(
            "{RATED_SELECT}
             {FILTER_WHERE}
             GROUP BY t.id, c.id
             ORDER BY rating DESC NULLS LAST, t.name, t.id
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, TitleRatingRow>(&query)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.year)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let mut genres: HashMap<DbId, Vec<Taxon>> = HashMap::new();
        for link in Self::genres_for_titles(pool, &ids).await? {
            genres
                .entry(link.title_id)
                .or_default()
                .push(taxon_from_link(link));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let genre = genres.remove(&row.id).unwrap_or_default();
                TitleDetail::from_row(row, genre)
            })
            .collect())
    }

    /// Count titles matching the same filter as [`TitleRepo::list`].
    pub async fn count(pool: &PgPool, filter: &TitleFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM titles t
             LEFT JOIN categories c ON c.id = t.category_id
             {FILTER_WHERE}"
        );
        sqlx::query_scalar(&query)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.year)
            .fetch_one(pool)
            .await
    }

    /// Update a title. Only non-`None` fields in `input` are applied; a
    /// present `genre_ids` replaces every genre link and `Some(None)` clears
    /// the description or category.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTitle,
    ) -> Result<Option<Title>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                category_id = CASE WHEN $6 THEN $7 ELSE category_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let title = sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.year)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(Option::as_deref))
            .bind(input.category_id.is_some())
            .bind(input.category_id.flatten())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(title) = title else {
            return Ok(None);
        };

        if let Some(genre_ids) = &input.genre_ids {
            sqlx::query("DELETE FROM genre_titles WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_genres(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(title))
    }

    /// Delete a title. Reviews, their comments and genre links cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Genres linked to any of `title_ids`, ordered by genre name.
    pub async fn genres_for_titles(
        pool: &PgPool,
        title_ids: &[DbId],
    ) -> Result<Vec<TitleGenreRow>, sqlx::Error> {
        if title_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, TitleGenreRow>(
            "SELECT gt.title_id, g.id, g.name, g.slug
             FROM genre_titles gt
             JOIN genres g ON g.id = gt.genre_id
             WHERE gt.title_id = ANY($1)
             ORDER BY g.name, g.id",
        )
        .bind(title_ids)
        .fetch_all(pool)
        .await
    }
}

async fn link_genres(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    title_id: DbId,
    genre_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    if genre_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO genre_titles (genre_id, title_id)
         SELECT UNNEST($1::BIGINT[]), $2
         ON CONFLICT ON CONSTRAINT uq_genre_titles_pair DO NOTHING",
    )
    .bind(genre_ids)
    .bind(title_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn taxon_from_link(link: TitleGenreRow) -> Taxon {
    Taxon {
        id: link.id,
        name: link.name,
        slug: link.slug,
    }
}
