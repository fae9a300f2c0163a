//! Route definitions for tags, mounted at `/tags`.

use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_root_tags).post(tags::create_tag))
        .route("/suggest", get(tags::suggest_tags))
        .route(
            "/{name}",
            get(tags::get_tag)
                .put(tags::update_tag)
                .delete(tags::delete_tag),
        )
        .route("/{name}/path", get(tags::get_tag_path))
}
