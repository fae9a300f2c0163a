//! Handlers for wiki page comments (issues, requests, discussions).
//!
//! A comment records the page revision it was opened against and, once
//! closed, the revision that resolved it. Status changes go through
//! [`CommentStatus::transition_to`] and are applied with a compare-and-set
//! update so two reviewers cannot both move the same comment.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use biowiki_core::comment::{validate_detail, validate_issue, CommentStatus};
use biowiki_core::error::CoreError;
use biowiki_core::types::DbId;
use biowiki_db::models::comment::{CreatePageComment, PageComment, UpdateCommentStatus};
use biowiki_db::repositories::PageCommentRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::wiki::ensure_page;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_comment(pool: &PgPool, page_id: DbId, id: DbId) -> AppResult<PageComment> {
    PageCommentRepo::find(pool, page_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PageComment",
            id,
        }))
}

/// GET /wiki/pages/{title}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, &title).await?;
    let comments = PageCommentRepo::list_by_page(&state.pool, page.id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /wiki/pages/{title}/comments
///
/// Open a comment at the page's current revision.
pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(title): Path<String>,
    Json(input): Json<CreatePageComment>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, &title).await?;
    validate_issue(input.comment_type, input.issue)?;
    validate_detail(&input.detail)?;

    let comment = PageCommentRepo::create(
        &state.pool,
        page.id,
        auth.user_id,
        input.comment_type,
        input.issue,
        &input.detail,
    )
    .await?;

    tracing::info!(
        comment_id = comment.id,
        page_id = page.id,
        comment_type = %comment.comment_type,
        user_id = auth.user_id,
        "Page comment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// GET /wiki/pages/{title}/comments/{id}
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title, id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, &title).await?;
    let comment = ensure_comment(&state.pool, page.id, id).await?;
    Ok(Json(DataResponse { data: comment }))
}

/// PUT /wiki/pages/{title}/comments/{id}/status
///
/// Move a comment to a new status. Illegal moves are 409 INVALID_TRANSITION;
/// losing a race against another status change is 409 CONFLICT.
pub async fn update_comment_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((title, id)): Path<(String, DbId)>,
    Json(input): Json<UpdateCommentStatus>,
) -> AppResult<impl IntoResponse> {
    let page = ensure_page(&state.pool, &title).await?;
    let comment = ensure_comment(&state.pool, page.id, id).await?;

    let current = CommentStatus::parse(&comment.status)
        .map_err(|e| AppError::Core(CoreError::Integrity(e.to_string())))?;
    let change = current.transition_to(input.status)?;

    let updated = PageCommentRepo::transition(&state.pool, id, current, input.status, change)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Comment {id} changed status concurrently; reload and retry"
            )))
        })?;

    tracing::info!(
        comment_id = id,
        page_id = page.id,
        from = %current,
        to = %input.status,
        final_revision_id = ?updated.final_revision_id,
        user_id = auth.user_id,
        "Page comment status changed"
    );

    Ok(Json(DataResponse { data: updated }))
}
