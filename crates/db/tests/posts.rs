//! Integration tests for questions, replies, views, and votes.
//!
//! Exercises `MainPostRepo`, `ReplyPostRepo`, and `VoteRepo`:
//! - Reply creation and deletion keep `reply_count` in step
//! - Deleting a reply removes its votes
//! - Replies are listed with their current revision
//! - The unanswered tab filters on `reply_count`
//! - Views are deduplicated per viewer key within the window
//! - Votes upsert per voter and refresh the cached tally

use biowiki_core::posts::IndexTab;
use biowiki_core::votes::VoteTarget;
use biowiki_db::models::main_post::MainPost;
use biowiki_db::models::revision::{NewRevision, ReplyPostHistory};
use biowiki_db::repositories::{MainPostRepo, ReplyPostRepo, RevisionRepo, VoteRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ask(pool: &PgPool, title: &str) -> MainPost {
    let (post, _) = MainPostRepo::create(pool, title, 1, NewRevision::new("details", Some(1)))
        .await
        .unwrap();
    post
}

async fn reload(pool: &PgPool, id: i64) -> MainPost {
    MainPostRepo::find_by_id(pool, id).await.unwrap().unwrap()
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_reply_count_follows_replies(pool: PgPool) {
    let post = ask(&pool, "Which aligner?").await;

    let (r1, rev) = ReplyPostRepo::create(&pool, post.id, 2, NewRevision::new("bwa", Some(2)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rev.revision_number, 1);
    assert_eq!(r1.current_revision_id, Some(rev.id));
    ReplyPostRepo::create(&pool, post.id, 3, NewRevision::new("bowtie", Some(3)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reload(&pool, post.id).await.reply_count, 2);

    ReplyPostRepo::delete(&pool, r1.id).await.unwrap().unwrap();
    assert_eq!(reload(&pool, post.id).await.reply_count, 1);

    assert!(ReplyPostRepo::delete(&pool, r1.id).await.unwrap().is_none());
    assert_eq!(reload(&pool, post.id).await.reply_count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reply_to_missing_post_returns_none(pool: PgPool) {
    let result = ReplyPostRepo::create(&pool, 424_242, 2, NewRevision::new("hi", Some(2)))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replies_listed_with_current_revision(pool: PgPool) {
    let post = ask(&pool, "Best assembler?").await;
    let (reply, _) = ReplyPostRepo::create(&pool, post.id, 2, NewRevision::new("spades", Some(2)))
        .await
        .unwrap()
        .unwrap();
    RevisionRepo::create::<ReplyPostHistory>(
        &pool,
        reply.id,
        NewRevision::new("SPAdes for bacteria", Some(2)).with_summary(Some("clarify")),
    )
    .await
    .unwrap()
    .unwrap();

    let replies = ReplyPostRepo::list_with_revisions(&pool, post.id).await.unwrap();
    assert_eq!(replies.len(), 1);
    let current = replies[0].current_revision.as_ref().unwrap();
    assert_eq!(current.revision_number, 2);
    assert_eq!(current.content, "SPAdes for bacteria");
    assert_eq!(current.revision_summary.as_deref(), Some("clarify"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unanswered_tab(pool: PgPool) {
    let answered = ask(&pool, "Answered").await;
    let open = ask(&pool, "Open").await;
    ReplyPostRepo::create(&pool, answered.id, 2, NewRevision::new("yes", Some(2)))
        .await
        .unwrap();

    let unanswered = MainPostRepo::list(&pool, IndexTab::Unanswered, 20, 0).await.unwrap();
    let ids: Vec<i64> = unanswered.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![open.id]);

    let all = MainPostRepo::list(&pool, IndexTab::All, 20, 0).await.unwrap();
    assert_eq!(all.len(), 2);
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_repeat_view_within_window_is_not_counted(pool: PgPool) {
    let post = ask(&pool, "Viewed").await;

    let first = MainPostRepo::record_view(&pool, post.id, Some("user:5"), 1800)
        .await
        .unwrap();
    let again = MainPostRepo::record_view(&pool, post.id, Some("user:5"), 1800)
        .await
        .unwrap();
    let other = MainPostRepo::record_view(&pool, post.id, Some("ip:10.0.0.1"), 1800)
        .await
        .unwrap();

    assert_eq!(first, Some(true));
    assert_eq!(again, Some(false));
    assert_eq!(other, Some(true));
    assert_eq!(reload(&pool, post.id).await.view_count, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_anonymous_views_always_count(pool: PgPool) {
    let post = ask(&pool, "Anonymous").await;
    for _ in 0..3 {
        MainPostRepo::record_view(&pool, post.id, None, 1800).await.unwrap();
    }
    assert_eq!(reload(&pool, post.id).await.view_count, 3);

    let missing = MainPostRepo::record_view(&pool, 777_777, None, 1800).await.unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_votes_upsert_and_refresh_cache(pool: PgPool) {
    let post = ask(&pool, "Vote on me").await;

    assert_eq!(VoteRepo::cast(&pool, 10, VoteTarget::MainPost, post.id, 1).await.unwrap(), 1);
    assert_eq!(VoteRepo::cast(&pool, 11, VoteTarget::MainPost, post.id, 1).await.unwrap(), 2);
    assert_eq!(VoteRepo::cast(&pool, 12, VoteTarget::MainPost, post.id, -1).await.unwrap(), 1);
    // Changing a vote replaces it rather than adding a second one.
    assert_eq!(VoteRepo::cast(&pool, 10, VoteTarget::MainPost, post.id, -1).await.unwrap(), -1);

    assert_eq!(reload(&pool, post.id).await.vote_count, -1);
    assert_eq!(VoteRepo::count(&pool, VoteTarget::MainPost, post.id).await.unwrap(), -1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_votes_are_scoped_by_content_type(pool: PgPool) {
    let post = ask(&pool, "Scoped").await;
    VoteRepo::cast(&pool, 10, VoteTarget::Page, post.id, 1).await.unwrap();

    assert_eq!(VoteRepo::count(&pool, VoteTarget::Page, post.id).await.unwrap(), 1);
    assert_eq!(VoteRepo::count(&pool, VoteTarget::MainPost, post.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_reply_removes_its_votes(pool: PgPool) {
    let post = ask(&pool, "Which caller?").await;
    let (reply, _) = ReplyPostRepo::create(&pool, post.id, 2, NewRevision::new("gatk", Some(2)))
        .await
        .unwrap()
        .unwrap();

    VoteRepo::cast(&pool, 10, VoteTarget::ReplyPost, reply.id, 1).await.unwrap();
    VoteRepo::cast(&pool, 11, VoteTarget::ReplyPost, reply.id, -1).await.unwrap();
    // Same object id under another content type must survive.
    VoteRepo::cast(&pool, 10, VoteTarget::Page, reply.id, 1).await.unwrap();

    ReplyPostRepo::delete(&pool, reply.id).await.unwrap().unwrap();

    let (left,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM votes WHERE content_type = 'reply_post' AND object_id = $1",
    )
    .bind(reply.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(left, 0);
    assert_eq!(VoteRepo::count(&pool, VoteTarget::Page, reply.id).await.unwrap(), 1);
}
