//! Handlers for the `/titles` resource.
//!
//! Writes take category and genres as slugs; every response uses the nested
//! read representation with the computed rating.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer};
use validator::Validate;
use yamdb_core::access::{authorize, Operation, Resource};
use yamdb_core::error::CoreError;
use yamdb_core::types::DbId;
use yamdb_core::validators::{year_rule, MAX_NAME_LENGTH};
use yamdb_db::models::taxonomy::Taxonomy;
use yamdb_db::models::title::{CreateTitle, TitleDetail, UpdateTitle};
use yamdb_db::repositories::{TaxonomyRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::AppResult;
use crate::extract::{Path, Query, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::query::TitleListParams;
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /titles`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTitleRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,
    #[validate(custom(function = "year_rule"))]
    pub year: i32,
    pub description: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Genre slugs.
    #[serde(default)]
    pub genre: Vec<String>,
}

/// Request body for `PATCH /titles/{title_id}`. A present `genre` replaces
/// the whole genre set; an explicit `null` clears `description` or
/// `category`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTitleRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,
    #[validate(custom(function = "year_rule"))]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    pub genre: Option<Vec<String>>,
}

/// Marks a field that appeared in the body, so `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles
///
/// Ordered by rating (unrated last), then name.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TitleListParams>,
) -> AppResult<Json<Page<TitleDetail>>> {
    let (limit, offset) = params.bounds();
    let filter = params.filter();
    let titles = TitleRepo::list(&state.pool, &filter, limit, offset).await?;
    let count = TitleRepo::count(&state.pool, &filter).await?;
    Ok(Json(Page::new(count, titles)))
}

/// GET /api/v1/titles/{title_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
) -> AppResult<Json<TitleDetail>> {
    Ok(Json(load_detail(&state.pool, title_id).await?))
}

/// POST /api/v1/titles
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateTitleRequest>,
) -> AppResult<(StatusCode, Json<TitleDetail>)> {
    authorize(Some(&auth.principal), Operation::Write, Resource::Catalog)?;

    let category_id = match &input.category {
        Some(slug) => Some(resolve_category(&state.pool, slug).await?),
        None => None,
    };
    let genre_ids = resolve_genres(&state.pool, &input.genre).await?;

    let title = TitleRepo::create(
        &state.pool,
        &CreateTitle {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        },
    )
    .await?;

    tracing::info!(title_id = title.id, user_id = auth.user.id, "Title created");
    let detail = load_detail(&state.pool, title.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PATCH /api/v1/titles/{title_id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateTitleRequest>,
) -> AppResult<Json<TitleDetail>> {
    authorize(Some(&auth.principal), Operation::Write, Resource::Catalog)?;

    let category_id = match &input.category {
        Some(Some(slug)) => Some(Some(resolve_category(&state.pool, slug).await?)),
        Some(None) => Some(None),
        None => None,
    };
    let genre_ids = match &input.genre {
        Some(slugs) => Some(resolve_genres(&state.pool, slugs).await?),
        None => None,
    };

    TitleRepo::update(
        &state.pool,
        title_id,
        &UpdateTitle {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        },
    )
    .await?
    .ok_or_else(|| CoreError::not_found("Title", title_id))?;

    tracing::info!(title_id, user_id = auth.user.id, "Title updated");
    Ok(Json(load_detail(&state.pool, title_id).await?))
}

/// DELETE /api/v1/titles/{title_id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(title_id): Path<DbId>,
) -> AppResult<StatusCode> {
    authorize(Some(&auth.principal), Operation::Write, Resource::Catalog)?;

    if !TitleRepo::delete(&state.pool, title_id).await? {
        return Err(CoreError::not_found("Title", title_id).into());
    }

    tracing::info!(title_id, user_id = auth.user.id, "Title deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_detail(pool: &DbPool, title_id: DbId) -> AppResult<TitleDetail> {
    let detail = TitleRepo::find_detail(pool, title_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", title_id))?;
    Ok(detail)
}

async fn resolve_category(pool: &DbPool, slug: &str) -> AppResult<DbId> {
    let category = TaxonomyRepo::find_by_slug(pool, Taxonomy::Category, slug)
        .await?
        .ok_or_else(|| {
            CoreError::invalid_field("category", format!("Category '{slug}' does not exist"))
        })?;
    Ok(category.id)
}

/// Map genre slugs to ids, rejecting the request if any slug is unknown.
async fn resolve_genres(pool: &DbPool, slugs: &[String]) -> AppResult<Vec<DbId>> {
    if slugs.is_empty() {
        return Ok(Vec::new());
    }
    let genres = TaxonomyRepo::find_by_slugs(pool, Taxonomy::Genre, slugs).await?;
    let missing: Vec<&str> = slugs
        .iter()
        .filter(|s| !genres.iter().any(|g| &g.slug == *s))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::invalid_field(
            "genre",
            format!("Unknown genre slug(s): {}", missing.join(", ")),
        )
        .into());
    }
    Ok(genres.into_iter().map(|g| g.id).collect())
}
