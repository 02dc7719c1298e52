//! Handlers for `/categories` and `/genres`.
//!
//! Both resources share one set of generic handlers, parameterised by a
//! [`TaxonomyKind`] marker so each route gets its own monomorphised handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::access::{authorize, Operation, Resource};
use yamdb_core::error::CoreError;
use yamdb_core::validators::{slug_rule, MAX_NAME_LENGTH};
use yamdb_db::models::taxonomy::{CreateTaxon, Taxon, Taxonomy, UpdateTaxon};
use yamdb_db::repositories::TaxonomyRepo;

use crate::error::AppResult;
use crate::extract::{Path, Query, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;

/// Selects the table a handler instance operates on.
pub trait TaxonomyKind: Send + Sync + 'static {
    const KIND: Taxonomy;
}

pub struct Categories;

impl TaxonomyKind for Categories {
    const KIND: Taxonomy = Taxonomy::Category;
}

pub struct Genres;

impl TaxonomyKind for Genres {
    const KIND: Taxonomy = Taxonomy::Genre;
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaxonRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,
    #[validate(custom(function = "slug_rule"))]
    pub slug: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaxonRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,
    #[validate(custom(function = "slug_rule"))]
    pub slug: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/{categories|genres}
pub async fn list<K: TaxonomyKind>(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Page<Taxon>>> {
    let (limit, offset) = params.bounds();
    let search = params.term();
    let items = TaxonomyRepo::list(&state.pool, K::KIND, search, limit, offset).await?;
    let count = TaxonomyRepo::count(&state.pool, K::KIND, search).await?;
    Ok(Json(Page::new(count, items)))
}

/// POST /api/v1/{categories|genres}
pub async fn create<K: TaxonomyKind>(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateTaxonRequest>,
) -> AppResult<(StatusCode, Json<Taxon>)> {
    authorize(Some(&auth.principal), Operation::Write, Resource::Catalog)?;

    let taxon = TaxonomyRepo::create(
        &state.pool,
        K::KIND,
        &CreateTaxon {
            name: input.name,
            slug: input.slug,
        },
    )
    .await?;

    tracing::info!(kind = K::KIND.entity(), slug = %taxon.slug, user_id = auth.user.id, "Created");
    Ok((StatusCode::CREATED, Json(taxon)))
}

/// PATCH /api/v1/{categories|genres}/{slug}
pub async fn update<K: TaxonomyKind>(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateTaxonRequest>,
) -> AppResult<Json<Taxon>> {
    authorize(Some(&auth.principal), Operation::Write, Resource::Catalog)?;

    let taxon = TaxonomyRepo::update_by_slug(
        &state.pool,
        K::KIND,
        &slug,
        &UpdateTaxon {
            name: input.name,
            slug: input.slug,
        },
    )
    .await?
    .ok_or_else(|| CoreError::not_found(K::KIND.entity(), &slug))?;

    tracing::info!(kind = K::KIND.entity(), slug = %taxon.slug, user_id = auth.user.id, "Updated");
    Ok(Json(taxon))
}

/// DELETE /api/v1/{categories|genres}/{slug}
pub async fn delete<K: TaxonomyKind>(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    authorize(Some(&auth.principal), Operation::Write, Resource::Catalog)?;

    if !TaxonomyRepo::delete_by_slug(&state.pool, K::KIND, &slug).await? {
        return Err(CoreError::not_found(K::KIND.entity(), &slug).into());
    }

    tracing::info!(kind = K::KIND.entity(), %slug, user_id = auth.user.id, "Deleted");
    Ok(StatusCode::NO_CONTENT)
}
