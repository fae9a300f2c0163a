//! Integration tests for revision histories.
//!
//! Exercises `PageRepo`, `MainPostRepo`, and the generic `RevisionRepo`:
//! - First revision is numbered 1 and becomes the current revision
//! - Subsequent revisions are numbered consecutively, including concurrent ones
//! - `get_previous` walks one step back and stops at revision 1
//! - Wiki revisions persist char stats; post revisions do not
//! - Editing with tags replaces the item's tags
//! - Revising a missing item returns `None`
//! - Only `(item, revision_number)` unique violations count as a numbering race

use biowiki_db::models::revision::{MainPostHistory, NewRevision, PageHistory};
use biowiki_db::models::tag::NewTag;
use biowiki_db::repositories::revision_repo::is_revision_number_conflict;
use biowiki_db::repositories::{MainPostRepo, PageRepo, RevisionRepo, TagRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn root_tag(name: &str) -> NewTag<'_> {
    NewTag {
        name,
        parent_id: None,
        wiki_page_id: None,
        categories: &[],
        icon: None,
        created_by: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_page_makes_first_revision_current(pool: PgPool) {
    let (page, rev) = PageRepo::create(&pool, "BLAST", NewRevision::new("hello", Some(7)))
        .await
        .unwrap();

    assert_eq!(rev.revision_number, 1);
    assert_eq!(rev.item_id, page.id);
    assert_eq!(page.current_revision_id, Some(rev.id));
    assert_eq!(rev.total_chars, Some(5));
    assert_eq!(rev.added_chars, Some(5));
    assert_eq!(rev.deleted_chars, Some(0));

    let stored = PageRepo::find_by_title(&pool, "BLAST").await.unwrap().unwrap();
    assert_eq!(stored.current_revision_id, Some(rev.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revisions_are_numbered_consecutively(pool: PgPool) {
    let (page, _) = PageRepo::create(&pool, "Genome", NewRevision::new("abc", None))
        .await
        .unwrap();

    let r2 = RevisionRepo::create::<PageHistory>(&pool, page.id, NewRevision::new("abd", None))
        .await
        .unwrap()
        .unwrap();
    let r3 = RevisionRepo::create::<PageHistory>(&pool, page.id, NewRevision::new("abde", None))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(r2.revision_number, 2);
    assert_eq!(r3.revision_number, 3);

    let current = RevisionRepo::current::<PageHistory>(&pool, page.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.id, r3.id);

    let numbers: Vec<i32> = RevisionRepo::list_history::<PageHistory>(&pool, page.id)
        .await
        .unwrap()
        .iter()
        .map(|r| r.revision_number)
        .collect();
    assert_eq!(numbers, vec![3, 2, 1]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_char_stats_compare_with_previous_revision(pool: PgPool) {
    let (page, _) = PageRepo::create(&pool, "Codon", NewRevision::new("abc", None))
        .await
        .unwrap();

    let rev = RevisionRepo::create::<PageHistory>(&pool, page.id, NewRevision::new("abd", None))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(rev.added_chars, Some(1));
    assert_eq!(rev.deleted_chars, Some(1));
    assert_eq!(rev.total_chars, Some(3));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_edits_get_distinct_numbers(pool: PgPool) {
    let (page, _) = PageRepo::create(&pool, "Protein", NewRevision::new("v1", None))
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        RevisionRepo::create::<PageHistory>(&pool, page.id, NewRevision::new("va", None)),
        RevisionRepo::create::<PageHistory>(&pool, page.id, NewRevision::new("vb", None)),
    );
    let mut numbers = vec![
        a.unwrap().unwrap().revision_number,
        b.unwrap().unwrap().revision_number,
    ];
    numbers.sort_unstable();
    assert_eq!(numbers, vec![2, 3]);

    let history = RevisionRepo::list_history::<PageHistory>(&pool, page.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_previous(pool: PgPool) {
    let (page, r1) = PageRepo::create(&pool, "Allele", NewRevision::new("one", None))
        .await
        .unwrap();
    let r2 = RevisionRepo::create::<PageHistory>(&pool, page.id, NewRevision::new("two", None))
        .await
        .unwrap()
        .unwrap();

    let prev = RevisionRepo::get_previous::<PageHistory>(&pool, &r2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(prev.id, r1.id);

    let none = RevisionRepo::get_previous::<PageHistory>(&pool, &r1).await.unwrap();
    assert!(none.is_none(), "revision 1 has no predecessor");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_post_revisions_have_no_char_stats(pool: PgPool) {
    let (post, rev) = MainPostRepo::create(
        &pool,
        "How do I align reads?",
        3,
        NewRevision::new("Question body", Some(3)),
    )
    .await
    .unwrap();

    assert_eq!(rev.revision_number, 1);
    assert_eq!(post.current_revision_id, Some(rev.id));
    assert!(rev.total_chars.is_none());
    assert!(rev.added_chars.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_edit_replaces_tags(pool: PgPool) {
    let bio = TagRepo::create(&pool, &root_tag("Biology")).await.unwrap();
    let chem = TagRepo::create(&pool, &root_tag("Chemistry")).await.unwrap();

    let first_tags = [bio.id];
    let (post, _) = MainPostRepo::create(
        &pool,
        "Tagged question",
        1,
        NewRevision::new("body", Some(1)).with_tags(Some(&first_tags[..])),
    )
    .await
    .unwrap();

    let tags = TagRepo::tags_for_item::<MainPostHistory>(&pool, post.id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "Biology");

    let second_tags = [chem.id];
    RevisionRepo::create::<MainPostHistory>(
        &pool,
        post.id,
        NewRevision::new("body v2", Some(1)).with_tags(Some(&second_tags[..])),
    )
    .await
    .unwrap()
    .unwrap();

    let tags = TagRepo::tags_for_item::<MainPostHistory>(&pool, post.id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "Chemistry");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revising_missing_item_returns_none(pool: PgPool) {
    let result = RevisionRepo::create::<PageHistory>(&pool, 999_999, NewRevision::new("x", None))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_page_title_is_rejected(pool: PgPool) {
    PageRepo::create(&pool, "Exon", NewRevision::new("a", None))
        .await
        .unwrap();
    let err = PageRepo::create(&pool, "Exon", NewRevision::new("b", None))
        .await
        .unwrap_err();

    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("uq_pages_title"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revision_number_conflict_is_classified(pool: PgPool) {
    let (page, _) = PageRepo::create(&pool, "Exon", NewRevision::new("one", None))
        .await
        .unwrap();

    let duplicate = sqlx::query(
        "INSERT INTO page_revisions \
         (page_id, revision_number, content, total_chars, added_chars, deleted_chars) \
         VALUES ($1, 1, 'dup', 3, 3, 0)",
    )
    .bind(page.id)
    .execute(&pool)
    .await
    .unwrap_err();
    assert!(is_revision_number_conflict(&duplicate));

    TagRepo::create(&pool, &root_tag("Splicing")).await.unwrap();
    let tag_clash = TagRepo::create(&pool, &root_tag("Splicing")).await.unwrap_err();
    assert!(!is_revision_number_conflict(&tag_clash));

    assert!(!is_revision_number_conflict(&sqlx::Error::RowNotFound));
}
