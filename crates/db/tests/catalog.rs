//! Integration tests for the catalog repositories.
//!
//! Exercises users, taxonomy, titles, reviews and comments against a real
//! database:
//! - Rating aggregation and ordering
//! - Title filters
//! - One review per (author, title)
//! - Cascade and SET NULL behaviour

use sqlx::PgPool;
use yamdb_core::roles::Role;
use yamdb_db::models::comment::CreateComment;
use yamdb_db::models::review::{CreateReview, UpdateReview};
use yamdb_db::models::taxonomy::{CreateTaxon, Taxonomy, UpdateTaxon};
use yamdb_db::models::title::{CreateTitle, TitleFilter, UpdateTitle};
use yamdb_db::models::user::{CreateUser, UpdateUser, User};
use yamdb_db::repositories::{CommentRepo, ReviewRepo, TaxonomyRepo, TitleRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

async fn new_taxon(pool: &PgPool, kind: Taxonomy, name: &str, slug: &str) -> i64 {
    TaxonomyRepo::create(
        pool,
        kind,
        &CreateTaxon {
            name: name.to_string(),
            slug: slug.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_title(
    pool: &PgPool,
    name: &str,
    year: i32,
    category_id: Option<i64>,
    genre_ids: Vec<i64>,
) -> i64 {
    TitleRepo::create(
        pool,
        &CreateTitle {
            name: name.to_string(),
            year,
            description: None,
            category_id,
            genre_ids,
        },
    )
    .await
    .unwrap()
    .id
}

async fn review(pool: &PgPool, title_id: i64, author_id: i64, score: i16) -> i64 {
    ReviewRepo::create(
        pool,
        &CreateReview {
            title_id,
            author_id,
            text: format!("score {score}"),
            score,
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_defaults_and_update(pool: PgPool) {
    let user = new_user(&pool, "alice").await;
    assert_eq!(user.role(), Role::User);
    assert_eq!(user.confirmation_code, "");
    assert!(user.confirmed_at.is_none());

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            bio: Some("reads a lot".into()),
            role: Some(Role::Moderator),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.bio, "reads a lot");
    assert_eq!(updated.role(), Role::Moderator);
    assert_eq!(updated.email, "alice@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_is_rejected(pool: PgPool) {
    new_user(&pool, "bob").await;
    let result = UserRepo::create(
        &pool,
        &CreateUser {
            username: "bob".into(),
            email: "other@example.com".into(),
            ..Default::default()
        },
    )
    .await;
    assert!(result.is_err(), "Duplicate username should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_confirmed_keeps_first_timestamp(pool: PgPool) {
    let user = new_user(&pool, "carol").await;
    UserRepo::mark_confirmed(&pool, user.id).await.unwrap();
    let first = UserRepo::find_by_id(&pool, user.id)
        .await
        .unwrap()
        .unwrap()
        .confirmed_at
        .expect("confirmed_at set");

    UserRepo::mark_confirmed(&pool, user.id).await.unwrap();
    let second = UserRepo::find_by_id(&pool, user.id)
        .await
        .unwrap()
        .unwrap()
        .confirmed_at;
    assert_eq!(second, Some(first));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_search_is_literal_substring(pool: PgPool) {
    new_user(&pool, "film_fan").await;
    new_user(&pool, "filmXfan").await;
    new_user(&pool, "reader").await;

    let found = UserRepo::list(&pool, Some("m_f"), 20, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "film_fan");
    assert_eq!(UserRepo::count(&pool, None).await.unwrap(), 3);
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_taxonomy_list_is_ordered_by_name(pool: PgPool) {
    new_taxon(&pool, Taxonomy::Genre, "Drama", "drama").await;
    new_taxon(&pool, Taxonomy::Genre, "Comedy", "comedy").await;
    new_taxon(&pool, Taxonomy::Category, "Film", "film").await;

    let genres = TaxonomyRepo::list(&pool, Taxonomy::Genre, None, 20, 0)
        .await
        .unwrap();
    let slugs: Vec<&str> = genres.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(slugs, ["comedy", "drama"]);

    let searched = TaxonomyRepo::list(&pool, Taxonomy::Genre, Some("dram"), 20, 0)
        .await
        .unwrap();
    assert_eq!(searched.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_taxonomy_update_and_delete_by_slug(pool: PgPool) {
    new_taxon(&pool, Taxonomy::Category, "Books", "books").await;

    let renamed = TaxonomyRepo::update_by_slug(
        &pool,
        Taxonomy::Category,
        "books",
        &UpdateTaxon {
            name: Some("Literature".into()),
            slug: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.name, "Literature");
    assert_eq!(renamed.slug, "books");

    assert!(TaxonomyRepo::delete_by_slug(&pool, Taxonomy::Category, "books")
        .await
        .unwrap());
    assert!(!TaxonomyRepo::delete_by_slug(&pool, Taxonomy::Category, "books")
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_category_keeps_title(pool: PgPool) {
    let film = new_taxon(&pool, Taxonomy::Category, "Film", "film").await;
    let title_id = new_title(&pool, "Solaris", 1972, Some(film), vec![]).await;

    TaxonomyRepo::delete_by_slug(&pool, Taxonomy::Category, "film")
        .await
        .unwrap();

    let detail = TitleRepo::find_detail(&pool, title_id)
        .await
        .unwrap()
        .expect("title survives category deletion");
    assert!(detail.category.is_none());
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rating_is_mean_of_scores(pool: PgPool) {
    let title_id = new_title(&pool, "Stalker", 1979, None, vec![]).await;
    let a = new_user(&pool, "a").await;
    let b = new_user(&pool, "b").await;
    review(&pool, title_id, a.id, 8).await;
    review(&pool, title_id, b.id, 10).await;

    let detail = TitleRepo::find_detail(&pool, title_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.rating, Some(9.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unrated_title_has_null_rating_and_sorts_last(pool: PgPool) {
    let unrated = new_title(&pool, "Aaa", 2000, None, vec![]).await;
    let low = new_title(&pool, "Bbb", 2000, None, vec![]).await;
    let high = new_title(&pool, "Ccc", 2000, None, vec![]).await;
    let user = new_user(&pool, "critic").await;
    review(&pool, low, user.id, 3).await;
    review(&pool, high, user.id, 7).await;

    let titles = TitleRepo::list(&pool, &TitleFilter::default(), 20, 0)
        .await
        .unwrap();
    let ids: Vec<i64> = titles.iter().map(|t| t.id).collect();
    assert_eq!(ids, [high, low, unrated]);
    assert_eq!(titles[2].rating, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_filters(pool: PgPool) {
    let film = new_taxon(&pool, Taxonomy::Category, "Film", "film").await;
    let book = new_taxon(&pool, Taxonomy::Category, "Book", "book").await;
    let drama = new_taxon(&pool, Taxonomy::Genre, "Drama", "drama").await;
    let scifi = new_taxon(&pool, Taxonomy::Genre, "Sci-Fi", "sci-fi").await;

    new_title(&pool, "Solaris", 1972, Some(film), vec![drama, scifi]).await;
    new_title(&pool, "Solaris", 1961, Some(book), vec![scifi]).await;
    new_title(&pool, "Mirror", 1975, Some(film), vec![drama]).await;

    let by_category = TitleFilter {
        category: Some("film".into()),
        ..Default::default()
    };
    assert_eq!(TitleRepo::count(&pool, &by_category).await.unwrap(), 2);

    let by_genre = TitleFilter {
        genre: Some("sci-fi".into()),
        ..Default::default()
    };
    assert_eq!(TitleRepo::count(&pool, &by_genre).await.unwrap(), 2);

    let by_name = TitleFilter {
        name: Some("sOLar".into()),
        year: Some(1961),
        ..Default::default()
    };
    let found = TitleRepo::list(&pool, &by_name, 20, 0).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category.as_ref().unwrap().slug, "book");
    assert_eq!(found[0].genre.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_title_update_replaces_genres(pool: PgPool) {
    let drama = new_taxon(&pool, Taxonomy::Genre, "Drama", "drama").await;
    let comedy = new_taxon(&pool, Taxonomy::Genre, "Comedy", "comedy").await;
    let title_id = new_title(&pool, "Playtime", 1967, None, vec![drama]).await;

    TitleRepo::update(
        &pool,
        title_id,
        &UpdateTitle {
            genre_ids: Some(vec![comedy]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    let detail = TitleRepo::find_detail(&pool, title_id)
        .await
        .unwrap()
        .unwrap();
    let slugs: Vec<&str> = detail.genre.iter().map(|g| g.slug.as_str()).collect();
    assert_eq!(slugs, ["comedy"]);
    assert_eq!(detail.name, "Playtime");
}

// ---------------------------------------------------------------------------
// Reviews and comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_review_by_same_author_fails(pool: PgPool) {
    let title_id = new_title(&pool, "Ran", 1985, None, vec![]).await;
    let user = new_user(&pool, "dave").await;
    review(&pool, title_id, user.id, 9).await;

    assert!(ReviewRepo::exists_for_author(&pool, title_id, user.id)
        .await
        .unwrap());

    let result = ReviewRepo::create(
        &pool,
        &CreateReview {
            title_id,
            author_id: user.id,
            text: "again".into(),
            score: 5,
        },
    )
    .await;
    let err = result.expect_err("Duplicate review should fail");
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_reviews_author_title"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_review_update_keeps_author(pool: PgPool) {
    let title_id = new_title(&pool, "Ikiru", 1952, None, vec![]).await;
    let user = new_user(&pool, "erin").await;
    let review_id = review(&pool, title_id, user.id, 4).await;

    let updated = ReviewRepo::update(
        &pool,
        review_id,
        &UpdateReview {
            text: None,
            score: Some(6),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.score, 6);
    assert_eq!(updated.text, "score 4");
    assert_eq!(updated.author, "erin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_review_deletes_comments(pool: PgPool) {
    let title_id = new_title(&pool, "Seven Samurai", 1954, None, vec![]).await;
    let user = new_user(&pool, "frank").await;
    let review_id = review(&pool, title_id, user.id, 10).await;
    let comment = CommentRepo::create(
        &pool,
        &CreateComment {
            review_id,
            author_id: user.id,
            text: "agreed".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(comment.author, "frank");

    assert!(ReviewRepo::delete(&pool, review_id).await.unwrap());
    assert!(CommentRepo::find_in_review(&pool, review_id, comment.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(CommentRepo::count_for_review(&pool, review_id, None).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_review_lookup_is_scoped_to_title(pool: PgPool) {
    let first = new_title(&pool, "One", 2001, None, vec![]).await;
    let second = new_title(&pool, "Two", 2002, None, vec![]).await;
    let user = new_user(&pool, "gina").await;
    let review_id = review(&pool, first, user.id, 5).await;

    assert!(ReviewRepo::find_in_title(&pool, first, review_id)
        .await
        .unwrap()
        .is_some());
    assert!(ReviewRepo::find_in_title(&pool, second, review_id)
        .await
        .unwrap()
        .is_none());
}
