//! Integration tests for the tag forest.
//!
//! Exercises `TagRepo` against a real database:
//! - Ancestor chains resolve to root-first paths
//! - Duplicate names violate `uq_tags_name`
//! - Substring suggestions are case-insensitive on request and paginated
//! - Deleting a tag reparents its children to its own parent
//! - Updates can clear the linked wiki page and icon
//! - A corrupted (cyclic) parent chain terminates and is reported

use assert_matches::assert_matches;
use biowiki_core::error::CoreError;
use biowiki_core::tag_tree::resolve_path;
use biowiki_db::models::tag::{NewTag, TagChanges};
use biowiki_db::models::revision::NewRevision;
use biowiki_db::repositories::{PageRepo, TagRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_tag(name: &str, parent_id: Option<i64>) -> NewTag<'_> {
    NewTag {
        name,
        parent_id,
        wiki_page_id: None,
        categories: &[],
        icon: None,
        created_by: Some(1),
    }
}

async fn path_of(pool: &PgPool, id: i64) -> Result<String, CoreError> {
    let chain = TagRepo::ancestors(pool, id).await.unwrap();
    resolve_path(&chain)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_nested_tag_path(pool: PgPool) {
    let c = TagRepo::create(&pool, &new_tag("C", None)).await.unwrap();
    let b = TagRepo::create(&pool, &new_tag("B", Some(c.id))).await.unwrap();
    let a = TagRepo::create(&pool, &new_tag("A", Some(b.id))).await.unwrap();

    assert_eq!(path_of(&pool, a.id).await.unwrap(), "C/B/A/");
    assert_eq!(path_of(&pool, c.id).await.unwrap(), "C/");

    let children = TagRepo::children(&pool, c.id).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "B");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_tag_name_is_rejected(pool: PgPool) {
    TagRepo::create(&pool, &new_tag("Genomics", None)).await.unwrap();
    let err = TagRepo::create(&pool, &new_tag("Genomics", None))
        .await
        .unwrap_err();

    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_tags_name"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_suggest_matches_substring(pool: PgPool) {
    for name in ["Bioinformatics", "Biology", "Chemistry"] {
        TagRepo::create(&pool, &new_tag(name, None)).await.unwrap();
    }

    let names: Vec<String> = TagRepo::suggest(&pool, "bio", false, 10, 0)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Bioinformatics", "Biology"]);

    let sensitive = TagRepo::suggest(&pool, "bio", true, 10, 0).await.unwrap();
    assert!(sensitive.is_empty(), "case-sensitive search must not match 'Bio'");

    let second_page = TagRepo::suggest(&pool, "bio", false, 1, 1).await.unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].name, "Biology");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_suggest_treats_wildcards_literally(pool: PgPool) {
    TagRepo::create(&pool, &new_tag("RNA-seq", None)).await.unwrap();

    let hits = TagRepo::suggest(&pool, "%", false, 10, 0).await.unwrap();
    assert!(hits.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_reparents_children(pool: PgPool) {
    let root = TagRepo::create(&pool, &new_tag("Life", None)).await.unwrap();
    let mid = TagRepo::create(&pool, &new_tag("Cells", Some(root.id))).await.unwrap();
    let leaf = TagRepo::create(&pool, &new_tag("Ribosome", Some(mid.id))).await.unwrap();

    let moved = TagRepo::delete_reparenting(&pool, mid.id).await.unwrap();
    assert_eq!(moved, Some(1));

    let leaf = TagRepo::find_by_id(&pool, leaf.id).await.unwrap().unwrap();
    assert_eq!(leaf.parent_id, Some(root.id));
    assert_eq!(path_of(&pool, leaf.id).await.unwrap(), "Life/Ribosome/");

    let missing = TagRepo::delete_reparenting(&pool, mid.id).await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_moves_tag_to_root(pool: PgPool) {
    let root = TagRepo::create(&pool, &new_tag("Omics", None)).await.unwrap();
    let child = TagRepo::create(&pool, &new_tag("Proteomics", Some(root.id)))
        .await
        .unwrap();

    let changes = TagChanges {
        parent_id: Some(None),
        icon: Some(Some("flask")),
        ..Default::default()
    };
    let updated = TagRepo::update(&pool, child.id, &changes).await.unwrap().unwrap();
    assert!(updated.parent_id.is_none());
    assert_eq!(updated.icon.as_deref(), Some("flask"));
    assert_eq!(updated.name, "Proteomics");

    let roots = TagRepo::list_roots(&pool, 10, 0).await.unwrap();
    assert_eq!(roots.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_clears_wiki_page_and_icon(pool: PgPool) {
    let (page, _) = PageRepo::create(&pool, "Metabolomics", NewRevision::new("about", None))
        .await
        .unwrap();
    let tag = TagRepo::create(
        &pool,
        &NewTag {
            wiki_page_id: Some(page.id),
            icon: Some("beaker"),
            ..new_tag("Metabolites", None)
        },
    )
    .await
    .unwrap();

    // Untouched fields keep their values.
    let renamed = TagChanges {
        name: Some("Metabolite"),
        ..Default::default()
    };
    let updated = TagRepo::update(&pool, tag.id, &renamed).await.unwrap().unwrap();
    assert_eq!(updated.wiki_page_id, Some(page.id));
    assert_eq!(updated.icon.as_deref(), Some("beaker"));

    let cleared = TagChanges {
        wiki_page_id: Some(None),
        icon: Some(None),
        ..Default::default()
    };
    let updated = TagRepo::update(&pool, tag.id, &cleared).await.unwrap().unwrap();
    assert!(updated.wiki_page_id.is_none());
    assert!(updated.icon.is_none());
    assert_eq!(updated.name, "Metabolite");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cyclic_chain_is_reported(pool: PgPool) {
    let a = TagRepo::create(&pool, &new_tag("Loop A", None)).await.unwrap();
    let b = TagRepo::create(&pool, &new_tag("Loop B", Some(a.id))).await.unwrap();

    // Corrupt the forest behind the repository's back.
    sqlx::query("UPDATE tags SET parent_id = $1 WHERE id = $2")
        .bind(b.id)
        .bind(a.id)
        .execute(&pool)
        .await
        .unwrap();

    assert_matches!(path_of(&pool, b.id).await, Err(CoreError::Integrity(_)));
}
