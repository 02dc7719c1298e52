//! One struct per CSV file, deserialized by header name.
//!
//! Every row carries its own `id`, which is inserted verbatim so that
//! cross-file references (`author`, `title_id`, ...) line up.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use sqlx::PgPool;
use yamdb_core::error::CoreError;
use yamdb_core::roles::Role;
use yamdb_core::types::{DbId, Timestamp};
use yamdb_core::validators::{validate_score, validate_slug, validate_username, validate_year};

/// A CSV row that maps onto exactly one table row.
pub(crate) trait ImportRow: DeserializeOwned {
    /// File name inside the import directory.
    const FILE: &'static str;
    /// Target table, also used to reset its id sequence.
    const TABLE: &'static str;

    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn insert(&self, pool: &PgPool) -> Result<(), sqlx::Error>;
}

// ---------------------------------------------------------------------------
// users.csv
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct UserRow {
    pub id: DbId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl UserRow {
    /// An empty role column means the default role.
    fn role(&self) -> Result<Role, CoreError> {
        if self.role.is_empty() {
            Ok(Role::default())
        } else {
            self.role.parse()
        }
    }
}

impl ImportRow for UserRow {
    const FILE: &'static str = "users.csv";
    const TABLE: &'static str = "users";

    fn validate(&self) -> Result<(), CoreError> {
        validate_username(&self.username)?;
        self.role()?;
        Ok(())
    }

    async fn insert(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO users (id, username, email, role, bio, first_name, last_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(self.id)
        .bind(&self.username)
        .bind(&self.email)
        .bind(self.role().unwrap_or_default().as_str())
        .bind(&self.bio)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .execute(pool)
        .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// category.csv / genre.csv
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRow {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreRow {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

async fn insert_taxon(
    pool: &PgPool,
    table: &str,
    id: DbId,
    name: &str,
    slug: &str,
) -> Result<(), sqlx::Error> {
    let query = format!("INSERT INTO {table} (id, name, slug) VALUES ($1, $2, $3)");
    sqlx::query(&query)
        .bind(id)
        .bind(name)
        .bind(slug)
        .execute(pool)
        .await?;
    Ok(())
}

impl ImportRow for CategoryRow {
    const FILE: &'static str = "category.csv";
    const TABLE: &'static str = "categories";

    fn validate(&self) -> Result<(), CoreError> {
        validate_slug(&self.slug)
    }

    async fn insert(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        insert_taxon(pool, Self::TABLE, self.id, &self.name, &self.slug).await
    }
}

impl ImportRow for GenreRow {
    const FILE: &'static str = "genre.csv";
    const TABLE: &'static str = "genres";

    fn validate(&self) -> Result<(), CoreError> {
        validate_slug(&self.slug)
    }

    async fn insert(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        insert_taxon(pool, Self::TABLE, self.id, &self.name, &self.slug).await
    }
}

// ---------------------------------------------------------------------------
// titles.csv
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TitleRow {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    /// Category id; empty for uncategorised titles.
    pub category: Option<DbId>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ImportRow for TitleRow {
    const FILE: &'static str = "titles.csv";
    const TABLE: &'static str = "titles";

    fn validate(&self) -> Result<(), CoreError> {
        validate_year(self.year)
    }

    async fn insert(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO titles (id, name, year, description, category_id) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(self.id)
        .bind(&self.name)
        .bind(self.year)
        .bind(self.description.as_deref().filter(|d| !d.is_empty()))
        .bind(self.category)
        .execute(pool)
        .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// review.csv / comments.csv
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRow {
    pub id: DbId,
    pub title_id: DbId,
    pub text: String,
    /// Author user id.
    pub author: DbId,
    pub score: i16,
    pub pub_date: Timestamp,
}

impl ImportRow for ReviewRow {
    const FILE: &'static str = "review.csv";
    const TABLE: &'static str = "reviews";

    fn validate(&self) -> Result<(), CoreError> {
        validate_score(self.score)
    }

    async fn insert(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO reviews (id, title_id, author_id, text, score, pub_date) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(self.id)
        .bind(self.title_id)
        .bind(self.author)
        .bind(&self.text)
        .bind(self.score)
        .bind(self.pub_date)
        .execute(pool)
        .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRow {
    pub id: DbId,
    pub review_id: DbId,
    pub text: String,
    pub author: DbId,
    pub pub_date: Timestamp,
}

impl ImportRow for CommentRow {
    const FILE: &'static str = "comments.csv";
    const TABLE: &'static str = "comments";

    async fn insert(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO comments (id, review_id, author_id, text, pub_date) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(self.id)
        .bind(self.review_id)
        .bind(self.author)
        .bind(&self.text)
        .bind(self.pub_date)
        .execute(pool)
        .await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// genre_title.csv
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct GenreTitleRow {
    pub id: DbId,
    pub title_id: DbId,
    pub genre_id: DbId,
}

impl ImportRow for GenreTitleRow {
    const FILE: &'static str = "genre_title.csv";
    const TABLE: &'static str = "genre_titles";

    async fn insert(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO genre_titles (id, genre_id, title_id) VALUES ($1, $2, $3)")
            .bind(self.id)
            .bind(self.genre_id)
            .bind(self.title_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
