//! End-to-end import of a small CSV fixture set.

use std::fs;
use std::path::Path;

use assert_matches::assert_matches;
use sqlx::PgPool;
use yamdb_db::models::taxonomy::{CreateTaxon, Taxonomy};
use yamdb_db::models::title::TitleFilter;
use yamdb_db::repositories::{ReviewRepo, TaxonomyRepo, TitleRepo, UserRepo};
use yamdb_importer::{import_dir, ImportError};

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

/// A consistent fixture set with one bad row in most files.
fn write_fixtures(dir: &Path) {
    write(
        dir,
        "users.csv",
        "id,username,email,role,bio,first_name,last_name\n\
         100,bingobongo,bingobongo@yamdb.fake,user,,,\n\
         101,capt_obvious,capt_obvious@yamdb.fake,admin,,,\n\
         102,me,me@yamdb.fake,user,,,\n",
    );
    write(
        dir,
        "category.csv",
        "id,name,slug\n\
         1,Фильм,movie\n\
         2,Книга,book\n",
    );
    write(
        dir,
        "genre.csv",
        "id,name,slug\n\
         1,Драма,drama\n\
         2,Комедия,comedy\n\
         3,Broken,not a slug\n",
    );
    write(
        dir,
        "titles.csv",
        "id,name,year,category\n\
         1,Побег из Шоушенка,1994,1\n\
         2,Крестный отец,1972,1\n\
         3,Ghost category,2000,99\n",
    );
    write(
        dir,
        "review.csv",
        "id,title_id,text,author,score,pub_date\n\
         1,1,Ставлю десять звёзд,100,10,2019-09-24T21:08:21.567Z\n\
         2,1,Не привлекают,101,6,2019-09-24T21:08:21.567Z\n\
         3,1,Second review by the same author,100,1,2019-09-24T21:08:21.567Z\n\
         4,2,Too generous,100,11,2019-09-24T21:08:21.567Z\n",
    );
    write(
        dir,
        "comments.csv",
        "id,review_id,text,author,pub_date\n\
         1,1,Критик,101,2019-09-24T21:08:21.567Z\n\
         2,42,Orphan,101,2019-09-24T21:08:21.567Z\n",
    );
    write(
        dir,
        "genre_title.csv",
        "id,title_id,genre_id\n\
         1,1,1\n\
         2,2,1\n\
         3,2,2\n",
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn imports_rows_and_skips_bad_ones(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let summary = import_dir(&pool, dir.path()).await.unwrap();

    let counts: Vec<(&str, u64, u64)> = summary
        .files
        .iter()
        .map(|f| (f.file, f.inserted, f.skipped))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("users.csv", 2, 1),
            ("category.csv", 2, 0),
            ("genre.csv", 2, 1),
            ("titles.csv", 2, 1),
            ("review.csv", 2, 2),
            ("comments.csv", 1, 1),
            ("genre_title.csv", 3, 0),
        ]
    );
    assert_eq!(summary.inserted(), 14);
    assert_eq!(summary.skipped(), 6);

    let admin = UserRepo::find_by_id(&pool, 101).await.unwrap().unwrap();
    assert_eq!(admin.username, "capt_obvious");
    assert_eq!(admin.role, "admin");

    let title = TitleRepo::find_detail(&pool, 1).await.unwrap().unwrap();
    assert_eq!(title.rating, Some(8.0));
    assert_eq!(title.category.unwrap().slug, "movie");
    assert_eq!(title.genre.len(), 1);

    let reviews = ReviewRepo::list_for_title(&pool, 1, None, 20, 0).await.unwrap();
    assert_eq!(reviews.len(), 2);

    let listed = TitleRepo::list(&pool, &TitleFilter::default(), 20, 0)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sequences_continue_after_imported_ids(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    import_dir(&pool, dir.path()).await.unwrap();

    let created = TaxonomyRepo::create(
        &pool,
        Taxonomy::Category,
        &CreateTaxon {
            name: "Музыка".into(),
            slug: "music".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(created.id, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_files_are_reported_not_fatal(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "genre.csv", "id,name,slug\n1,Драма,drama\n");

    let summary = import_dir(&pool, dir.path()).await.unwrap();

    assert_eq!(summary.inserted(), 1);
    assert!(summary.file("users.csv").unwrap().missing);
    assert!(!summary.file("genre.csv").unwrap().missing);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_directory_is_an_error(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("nope");

    assert_matches!(
        import_dir(&pool, &absent).await,
        Err(ImportError::MissingDirectory(_))
    );
}
