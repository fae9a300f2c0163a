//! Handlers for Q&A questions (main posts).

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use biowiki_core::error::CoreError;
use biowiki_core::forms::{main_post_form, main_post_revision_form, reply_post_form, FormSpec};
use biowiki_core::posts::IndexTab;
use biowiki_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use biowiki_core::types::DbId;
use biowiki_core::validation::{validate_content, validate_summary, validate_title};
use biowiki_core::views::viewer_key;
use biowiki_core::votes::VoteTarget;
use biowiki_db::models::main_post::{CreateMainPost, MainPost, PostDetail, UpdateMainPost};
use biowiki_db::models::revision::{MainPostHistory, NewRevision};
use biowiki_db::models::vote::CastVote;
use biowiki_db::repositories::{MainPostRepo, ReplyPostRepo, RevisionRepo, TagRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::{tags::resolve_tag_ids, votes};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::query::TabParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// The three Q&A forms, for clients that render them generically.
#[derive(Debug, Serialize)]
pub struct PostForms {
    pub main_post: FormSpec,
    pub main_post_revision: FormSpec,
    pub reply_post: FormSpec,
}

/// Fetch a question or return 404.
pub(crate) async fn ensure_post(pool: &PgPool, id: DbId) -> AppResult<MainPost> {
    MainPostRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MainPost",
            id,
        }))
}

/// GET /posts?tab=&limit=&offset=
///
/// Question index. Unknown tabs fall back to `All`.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<TabParams>,
) -> AppResult<impl IntoResponse> {
    let tab = IndexTab::from_query(params.tab.as_deref());
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let posts = MainPostRepo::list(&state.pool, tab, limit, offset).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// GET /posts/form
pub async fn post_forms() -> impl IntoResponse {
    Json(DataResponse {
        data: PostForms {
            main_post: main_post_form(),
            main_post_revision: main_post_revision_form(),
            reply_post: reply_post_form(),
        },
    })
}

/// POST /posts
pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMainPost>,
) -> AppResult<impl IntoResponse> {
    let title = input.title.trim();
    validate_title(title)?;
    validate_content(&input.content)?;
    let tag_ids = resolve_tag_ids(&state.pool, input.tags.as_deref()).await?;

    let first = NewRevision::new(&input.content, Some(auth.user_id)).with_tags(tag_ids.as_deref());
    let (post, revision) = MainPostRepo::create(&state.pool, title, auth.user_id, first).await?;

    tracing::info!(
        post_id = post.id,
        revision_id = revision.id,
        user_id = auth.user_id,
        "Question posted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// GET /posts/{id}
///
/// Counts a view (deduplicated per viewer) and returns the question with
/// its replies.
pub async fn get_post(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok());
    let key = viewer_key(viewer.user_id(), forwarded_for);

    let counted = MainPostRepo::record_view(
        &state.pool,
        id,
        key.as_deref(),
        state.config.view_dedup_window_secs,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "MainPost",
        id,
    }))?;
    if counted {
        tracing::debug!(post_id = id, viewer = ?key, "View counted");
    }

    let post = ensure_post(&state.pool, id).await?;
    let current_revision = RevisionRepo::current::<MainPostHistory>(&state.pool, id).await?;
    let tags = TagRepo::tags_for_item::<MainPostHistory>(&state.pool, id).await?;
    let replies = ReplyPostRepo::list_with_revisions(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: PostDetail {
            post,
            current_revision,
            tags,
            replies,
        },
    }))
}

/// PUT /posts/{id}
///
/// Only the author may edit a question.
pub async fn update_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMainPost>,
) -> AppResult<impl IntoResponse> {
    let post = ensure_post(&state.pool, id).await?;
    auth.ensure_author(post.author_id, "question")?;

    validate_content(&input.content)?;
    if let Some(summary) = input.summary.as_deref() {
        validate_summary(summary)?;
    }
    let tag_ids = resolve_tag_ids(&state.pool, input.tags.as_deref()).await?;

    let new = NewRevision::new(&input.content, Some(auth.user_id))
        .with_summary(input.summary.as_deref())
        .with_tags(tag_ids.as_deref());
    let revision = RevisionRepo::create::<MainPostHistory>(&state.pool, id, new)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MainPost",
            id,
        }))?;

    tracing::info!(
        post_id = id,
        revision_number = revision.revision_number,
        user_id = auth.user_id,
        "Question revised"
    );

    Ok(Json(DataResponse { data: revision }))
}

/// GET /posts/{id}/history
pub async fn post_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = ensure_post(&state.pool, id).await?;
    let history = RevisionRepo::list_history::<MainPostHistory>(&state.pool, post.id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// POST /posts/{id}/vote
pub async fn vote_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CastVote>,
) -> AppResult<impl IntoResponse> {
    let post = ensure_post(&state.pool, id).await?;
    let summary = votes::cast(&state, &auth, VoteTarget::MainPost, post.id, input.choice).await?;
    Ok(Json(DataResponse { data: summary }))
}
