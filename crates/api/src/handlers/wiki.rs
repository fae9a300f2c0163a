//! Handlers for wiki pages and their revision history.
//!
//! Pages are addressed by title in URLs, with `_` standing in for spaces.
//! Every edit appends a revision carrying char-level diff stats against the
//! revision before it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use biowiki_core::error::CoreError;
use biowiki_core::revision::{diff_chars, CharStats};
use biowiki_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use biowiki_core::validation::{
    title_from_url, validate_content, validate_page_title, validate_summary,
};
use biowiki_core::votes::VoteTarget;
use biowiki_db::models::page::{CreatePage, Page, PageDetail, UpdatePage};
use biowiki_db::models::revision::{NewRevision, PageHistory, Revision, RevisionDiff};
use biowiki_db::models::vote::CastVote;
use biowiki_db::repositories::{PageRepo, RevisionRepo, TagRepo, VoteRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::{tags::resolve_tag_ids, votes};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Fetch a page by its URL title or return 404.
pub(crate) async fn ensure_page(pool: &PgPool, url_title: &str) -> AppResult<Page> {
    let title = title_from_url(url_title);
    PageRepo::find_by_title(pool, &title).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFoundByName {
            entity: "Page",
            name: title,
        })
    })
}

/// Fetch revision `number` of a page or return 404.
async fn ensure_revision(pool: &PgPool, page: &Page, number: i32) -> AppResult<Revision> {
    RevisionRepo::find_by_number::<PageHistory>(pool, page.id, number)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByName {
                entity: "PageRevision",
                name: format!("{}#{number}", page.title),
            })
        })
}

async fn page_detail(pool: &PgPool, page: Page) -> AppResult<PageDetail> {
    let current_revision = RevisionRepo::current::<PageHistory>(pool, page.id).await?;
    let tags = TagRepo::tags_for_item::<PageHistory>(pool, page.id).await?;
    let vote_count = VoteRepo::count(pool, VoteTarget::Page, page.id).await?;
    Ok(PageDetail {
        url_title: page.url_title(),
        page,
        current_revision,
        tags,
        vote_count,
    })
}

fn validate_edit(content: &str, summary: Option<&str>) -> AppResult<()> {
    validate_content(content)?;
    if let Some(summary) = summary {
        validate_summary(summary)?;
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Pages
-------------------------------------------------------------------------- */

/// GET /wiki/pages
pub async fn list_pages(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let pages = PageRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: pages }))
}

/// POST /wiki/pages
///
/// Create a page together with revision 1.
pub async fn create_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePage>,
) -> AppResult<impl IntoResponse> {
    let title = input.title.trim();
    validate_page_title(title)?;
    validate_edit(&input.content, input.summary.as_deref())?;
    let tag_ids = resolve_tag_ids(&state.pool, input.tags.as_deref()).await?;

    let first = NewRevision::new(&input.content, Some(auth.user_id))
        .with_summary(input.summary.as_deref())
        .with_tags(tag_ids.as_deref());
    let (page, revision) = PageRepo::create(&state.pool, title, first).await?;

    tracing::info!(
        page_id = page.id,
        title = %page.title,
        revision_id = revision.id,
        total_chars = ?revision.total_chars,
        user_id = auth.user_id,
        "Wiki page created"
    );

    let detail = page_detail(&state.pool, page).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /wiki/pages/{title}
pub async fn get_page(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, &title).await?;
    let detail = page_detail(&state.pool, page).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /wiki/pages/{title}
///
/// Edit a page by appending a revision. `tags`, when present, replaces the
/// page's tags in the same transaction.
pub async fn update_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(title): Path<String>,
    Json(input): Json<UpdatePage>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, &title).await?;
    validate_edit(&input.content, input.summary.as_deref())?;
    let tag_ids = resolve_tag_ids(&state.pool, input.tags.as_deref()).await?;

    let new = NewRevision::new(&input.content, Some(auth.user_id))
        .with_summary(input.summary.as_deref())
        .with_tags(tag_ids.as_deref());
    let revision = RevisionRepo::create::<PageHistory>(&state.pool, page.id, new)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Page",
            id: page.id,
        }))?;

    tracing::info!(
        page_id = page.id,
        revision_number = revision.revision_number,
        added_chars = ?revision.added_chars,
        deleted_chars = ?revision.deleted_chars,
        user_id = auth.user_id,
        "Wiki page revised"
    );

    Ok(Json(DataResponse { data: revision }))
}

/* --------------------------------------------------------------------------
Revisions
-------------------------------------------------------------------------- */

/// GET /wiki/pages/{title}/history
///
/// All revisions, most recently modified first.
pub async fn page_history(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, &title).await?;
    let history = RevisionRepo::list_history::<PageHistory>(&state.pool, page.id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /wiki/pages/{title}/revisions/{number}
pub async fn get_revision(
    State(state): State<AppState>,
    Path((title, number)): Path<(String, i32)>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, &title).await?;
    let revision = ensure_revision(&state.pool, &page, number).await?;
    Ok(Json(DataResponse { data: revision }))
}

/// GET /wiki/pages/{title}/revisions/{number}/previous
///
/// The revision before `number`; `data` is `null` for revision 1.
pub async fn get_previous_revision(
    State(state): State<AppState>,
    Path((title, number)): Path<(String, i32)>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, &title).await?;
    let revision = ensure_revision(&state.pool, &page, number).await?;
    let previous = RevisionRepo::get_previous::<PageHistory>(&state.pool, &revision).await?;
    Ok(Json(DataResponse { data: previous }))
}

/// GET /wiki/pages/{title}/revisions/{number}/diff
///
/// Char-level diff of revision `number` against its predecessor (empty
/// content for revision 1).
pub async fn revision_diff(
    State(state): State<AppState>,
    Path((title, number)): Path<(String, i32)>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, &title).await?;
    let revision = ensure_revision(&state.pool, &page, number).await?;
    let previous = RevisionRepo::get_previous::<PageHistory>(&state.pool, &revision).await?;

    let old = previous.as_ref().map_or("", |p| p.content.as_str());
    let fragments = diff_chars(old, &revision.content);
    let stats = CharStats::from_fragments(&fragments, &revision.content);

    Ok(Json(DataResponse {
        data: RevisionDiff {
            item_id: page.id,
            revision_number: revision.revision_number,
            previous_revision_number: previous.map(|p| p.revision_number),
            fragments,
            stats,
        },
    }))
}

/* --------------------------------------------------------------------------
Votes
-------------------------------------------------------------------------- */

/// POST /wiki/pages/{title}/vote
pub async fn vote_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(title): Path<String>,
    Json(input): Json<CastVote>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, &title).await?;
    let summary = votes::cast(&state, &auth, VoteTarget::Page, page.id, input.choice).await?;
    Ok(Json(DataResponse { data: summary }))
}
