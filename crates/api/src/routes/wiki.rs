//! Route definitions for wiki pages, mounted at `/wiki/pages`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{comments, wiki};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(wiki::list_pages).post(wiki::create_page))
        .route("/{title}", get(wiki::get_page).put(wiki::update_page))
        .route("/{title}/history", get(wiki::page_history))
        .route("/{title}/revisions/{number}", get(wiki::get_revision))
        .route(
            "/{title}/revisions/{number}/previous",
            get(wiki::get_previous_revision),
        )
        .route("/{title}/revisions/{number}/diff", get(wiki::revision_diff))
        .route("/{title}/vote", post(wiki::vote_page))
        .route(
            "/{title}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/{title}/comments/{id}", get(comments::get_comment))
        .route(
            "/{title}/comments/{id}/status",
            put(comments::update_comment_status),
        )
}
