//! Route definitions for the Q&A board.
//!
//! ```text
//! QUESTIONS (/posts):
//! GET    /                 list_posts
//! POST   /                 create_post
//! GET    /form             post_forms
//! GET    /{id}             get_post
//! PUT    /{id}             update_post
//! GET    /{id}/history     post_history
//! POST   /{id}/vote        vote_post
//! POST   /{id}/replies     create_reply
//!
//! REPLIES (/replies):
//! PUT    /{id}             update_reply
//! DELETE /{id}             delete_reply
//! GET    /{id}/history     reply_history
//! POST   /{id}/vote        vote_reply
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{posts, replies};
use crate::state::AppState;

/// Question routes, mounted at `/posts`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::list_posts).post(posts::create_post))
        .route("/form", get(posts::post_forms))
        .route("/{id}", get(posts::get_post).put(posts::update_post))
        .route("/{id}/history", get(posts::post_history))
        .route("/{id}/vote", post(posts::vote_post))
        .route("/{id}/replies", post(replies::create_reply))
}

/// Reply routes, mounted at `/replies`.
pub fn reply_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            put(replies::update_reply).delete(replies::delete_reply),
        )
        .route("/{id}/history", get(replies::reply_history))
        .route("/{id}/vote", post(replies::vote_reply))
}
