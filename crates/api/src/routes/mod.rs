pub mod health;
pub mod posts;
pub mod tags;
pub mod wiki;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /wiki/pages                                       list, create
/// /wiki/pages/{title}                               get, edit
/// /wiki/pages/{title}/history                       revision history
/// /wiki/pages/{title}/revisions/{number}            one revision
/// /wiki/pages/{title}/revisions/{number}/previous   the revision before it
/// /wiki/pages/{title}/revisions/{number}/diff       char-level diff
/// /wiki/pages/{title}/vote                          cast vote (POST)
/// /wiki/pages/{title}/comments                      list, create
/// /wiki/pages/{title}/comments/{id}                 get
/// /wiki/pages/{title}/comments/{id}/status          change status (PUT)
///
/// /posts                                            index (?tab=), ask
/// /posts/form                                       form specs
/// /posts/{id}                                       detail (counts a view), edit
/// /posts/{id}/history                               revision history
/// /posts/{id}/vote                                  cast vote (POST)
/// /posts/{id}/replies                               reply (POST)
///
/// /replies/{id}                                     edit, delete
/// /replies/{id}/history                             revision history
/// /replies/{id}/vote                                cast vote (POST)
///
/// /tags                                             list roots, create
/// /tags/suggest                                     name search
/// /tags/{name}                                      detail, edit, delete
/// /tags/{name}/path                                 root-first path
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Wiki pages, revisions, comments.
        .nest("/wiki/pages", wiki::router())
        // Q&A questions and their replies.
        .nest("/posts", posts::router())
        .nest("/replies", posts::reply_router())
        // Tag hierarchy.
        .nest("/tags", tags::router())
}
