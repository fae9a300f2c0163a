//! Handlers for replies to questions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use biowiki_core::error::CoreError;
use biowiki_core::types::DbId;
use biowiki_core::validation::{validate_content, validate_summary};
use biowiki_core::votes::VoteTarget;
use biowiki_db::models::reply_post::{
    CreateReplyPost, ReplyPost, ReplyWithRevision, UpdateReplyPost,
};
use biowiki_db::models::revision::{NewRevision, ReplyPostHistory};
use biowiki_db::models::vote::CastVote;
use biowiki_db::repositories::{ReplyPostRepo, RevisionRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::votes;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_reply(pool: &PgPool, id: DbId) -> AppResult<ReplyPost> {
    ReplyPostRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ReplyPost",
            id,
        }))
}

/// POST /posts/{id}/replies
pub async fn create_reply(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<CreateReplyPost>,
) -> AppResult<impl IntoResponse> {
    validate_content(&input.content)?;

    let first = NewRevision::new(&input.content, Some(auth.user_id));
    let (reply, revision) = ReplyPostRepo::create(&state.pool, post_id, auth.user_id, first)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MainPost",
            id: post_id,
        }))?;

    tracing::info!(
        reply_id = reply.id,
        post_id,
        user_id = auth.user_id,
        "Reply posted"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ReplyWithRevision {
                reply,
                current_revision: Some(revision),
            },
        }),
    ))
}

/// PUT /replies/{id}
///
/// Only the author may edit a reply.
pub async fn update_reply(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReplyPost>,
) -> AppResult<impl IntoResponse> {
    let reply = ensure_reply(&state.pool, id).await?;
    auth.ensure_author(reply.author_id, "reply")?;

    validate_content(&input.content)?;
    if let Some(summary) = input.summary.as_deref() {
        validate_summary(summary)?;
    }

    let new = NewRevision::new(&input.content, Some(auth.user_id))
        .with_summary(input.summary.as_deref());
    let revision = RevisionRepo::create::<ReplyPostHistory>(&state.pool, id, new)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ReplyPost",
            id,
        }))?;

    tracing::info!(
        reply_id = id,
        revision_number = revision.revision_number,
        user_id = auth.user_id,
        "Reply revised"
    );

    Ok(Json(DataResponse { data: revision }))
}

/// DELETE /replies/{id}
///
/// Only the author may delete a reply. The question's `reply_count` drops
/// in the same transaction.
pub async fn delete_reply(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let reply = ensure_reply(&state.pool, id).await?;
    auth.ensure_author(reply.author_id, "reply")?;

    ReplyPostRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ReplyPost",
            id,
        }))?;

    tracing::info!(
        reply_id = id,
        post_id = reply.main_post_id,
        user_id = auth.user_id,
        "Reply deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /replies/{id}/history
pub async fn reply_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let reply = ensure_reply(&state.pool, id).await?;
    let history = RevisionRepo::list_history::<ReplyPostHistory>(&state.pool, reply.id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// POST /replies/{id}/vote
pub async fn vote_reply(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CastVote>,
) -> AppResult<impl IntoResponse> {
    let reply = ensure_reply(&state.pool, id).await?;
    let summary = votes::cast(&state, &auth, VoteTarget::ReplyPost, reply.id, input.choice).await?;
    Ok(Json(DataResponse { data: summary }))
}
