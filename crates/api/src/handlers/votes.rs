//! Shared vote handling for pages, posts, and replies.

use biowiki_core::types::DbId;
use biowiki_core::votes::{validate_choice, VoteTarget};
use biowiki_db::models::vote::VoteSummary;
use biowiki_db::repositories::VoteRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Record `auth`'s vote on an object that the caller has verified exists.
pub(crate) async fn cast(
    state: &AppState,
    auth: &AuthUser,
    target: VoteTarget,
    object_id: DbId,
    choice: i16,
) -> AppResult<VoteSummary> {
    validate_choice(choice)?;

    let vote_count = VoteRepo::cast(&state.pool, auth.user_id, target, object_id, choice).await?;

    tracing::info!(
        user_id = auth.user_id,
        content_type = %target,
        object_id,
        choice,
        vote_count,
        "Vote cast"
    );

    Ok(VoteSummary {
        content_type: target.as_str().to_string(),
        object_id,
        vote_count,
        your_choice: choice,
    })
}
