//! Handlers for the hierarchical tag registry.
//!
//! Tags are addressed by name in URLs, with `_` standing in for spaces.
//! Creating, editing, and deleting tags requires authentication.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use biowiki_core::error::CoreError;
use biowiki_core::search::{
    clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, MAX_SUGGEST_LIMIT,
};
use biowiki_core::tag_tree::{
    creation_hint, name_from_url, resolve_path, validate_tag_name, would_create_cycle,
};
use biowiki_core::types::DbId;
use biowiki_core::validation::{title_from_url, validate_tag_names};
use biowiki_db::models::tag::{
    CreateTag, NewTag, Tag, TagChanges, TagDetail, TagPath, TagSuggestParams, UpdateTag,
};
use biowiki_db::repositories::{PageRepo, TagRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Query param and response types
-------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub struct TagDetailParams {
    /// `Posts` (default) includes tagged questions in the detail.
    pub tab: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response for a created or edited tag.
#[derive(Debug, Serialize)]
pub struct TagWithPath {
    #[serde(flatten)]
    pub tag: Tag,
    pub path: String,
    /// Where the tag sits, phrased for the creation dialog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Fetch a tag by its URL name or return 404.
async fn ensure_tag(pool: &PgPool, url_name: &str) -> AppResult<Tag> {
    let name = name_from_url(url_name);
    TagRepo::find_by_name(pool, &name).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFoundByName {
            entity: "Tag",
            name,
        })
    })
}

/// Fetch a tag by its exact name, reporting a missing one as 404.
async fn ensure_tag_named(pool: &PgPool, name: &str) -> AppResult<Tag> {
    TagRepo::find_by_name(pool, name).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFoundByName {
            entity: "Tag",
            name: name.to_string(),
        })
    })
}

/// Root-first path of a tag, e.g. `"Biology/Genetics/"`.
async fn tag_path(pool: &PgPool, tag_id: DbId) -> AppResult<String> {
    let chain = TagRepo::ancestors(pool, tag_id).await?;
    Ok(resolve_path(&chain)?)
}

/// Resolve the id of the wiki page a tag links to.
async fn wiki_page_id(pool: &PgPool, title: Option<&str>) -> AppResult<Option<DbId>> {
    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let title = title_from_url(title);
    let page = PageRepo::find_by_title(pool, &title).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFoundByName {
            entity: "Page",
            name: title,
        })
    })?;
    Ok(Some(page.id))
}

/// Map submitted tag names to ids. `None` means "leave tags unchanged".
///
/// Every name must already exist; unknown names are a validation error.
pub(crate) async fn resolve_tag_ids(
    pool: &PgPool,
    names: Option<&[String]>,
) -> AppResult<Option<Vec<DbId>>> {
    let Some(names) = names else {
        return Ok(None);
    };
    validate_tag_names(names)?;

    let mut wanted: Vec<String> = names.iter().map(|n| n.trim().to_string()).collect();
    wanted.sort();
    wanted.dedup();

    let found = TagRepo::find_by_names(pool, &wanted).await?;
    if found.len() != wanted.len() {
        let missing: Vec<&str> = wanted
            .iter()
            .filter(|name| !found.iter().any(|t| &t.name == *name))
            .map(String::as_str)
            .collect();
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown tags: {}",
            missing.join(", ")
        ))));
    }
    Ok(Some(found.into_iter().map(|t| t.id).collect()))
}

/* --------------------------------------------------------------------------
Listing and lookup
-------------------------------------------------------------------------- */

/// GET /tags
///
/// List root tags (tags without a parent).
pub async fn list_root_tags(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let tags = TagRepo::list_roots(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// GET /tags/suggest?suggestion=&offset=
///
/// Tags whose name contains `suggestion`.
pub async fn suggest_tags(
    State(state): State<AppState>,
    Query(params): Query<TagSuggestParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, state.config.tag_suggest_limit, MAX_SUGGEST_LIMIT);
    let offset = clamp_offset(params.offset);

    let tags = TagRepo::suggest(
        &state.pool,
        params.suggestion.trim(),
        state.config.tag_search_case_sensitive,
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse { data: tags }))
}

/// GET /tags/{name}
///
/// Tag detail: path, children, linked wiki page, tagged pages, and (on the
/// default `Posts` tab) tagged questions.
pub async fn get_tag(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<TagDetailParams>,
) -> AppResult<impl IntoResponse> {
    let tag = ensure_tag(&state.pool, &name).await?;
    let path = tag_path(&state.pool, tag.id).await?;
    let children = TagRepo::children(&state.pool, tag.id).await?;
    let wiki_page = match tag.wiki_page_id {
        Some(id) => PageRepo::find_by_id(&state.pool, id).await?,
        None => None,
    };
    let pages = TagRepo::pages_for_tag(&state.pool, tag.id).await?;

    let show_posts = params
        .tab
        .as_deref()
        .map_or(true, |tab| tab.eq_ignore_ascii_case("posts"));
    let posts = if show_posts {
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(params.offset);
        Some(TagRepo::posts_for_tag(&state.pool, tag.id, limit, offset).await?)
    } else {
        None
    };

    Ok(Json(DataResponse {
        data: TagDetail {
            tag,
            path,
            children,
            wiki_page,
            pages,
            posts,
        },
    }))
}

/// GET /tags/{name}/path
pub async fn get_tag_path(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tag = ensure_tag(&state.pool, &name).await?;
    let path = tag_path(&state.pool, tag.id).await?;
    Ok(Json(DataResponse {
        data: TagPath {
            name: tag.name,
            path,
        },
    }))
}

/* --------------------------------------------------------------------------
Mutations
-------------------------------------------------------------------------- */

/// POST /tags
///
/// Create a tag, optionally nested under `parent_name`. A duplicate name is
/// a 409 via `uq_tags_name`.
pub async fn create_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.trim();
    validate_tag_name(name)?;

    let parent = match input.parent_name.as_deref().map(str::trim) {
        Some(parent_name) if !parent_name.is_empty() => {
            Some(ensure_tag_named(&state.pool, parent_name).await?)
        }
        _ => None,
    };
    let parent_path = match &parent {
        Some(p) => Some(tag_path(&state.pool, p.id).await?),
        None => None,
    };
    let wiki_page_id = wiki_page_id(&state.pool, input.wiki_page.as_deref()).await?;

    let tag = TagRepo::create(
        &state.pool,
        &NewTag {
            name,
            parent_id: parent.as_ref().map(|p| p.id),
            wiki_page_id,
            categories: &input.categories,
            icon: input.icon.as_deref(),
            created_by: Some(auth.user_id),
        },
    )
    .await?;

    let path = format!("{}{}/", parent_path.as_deref().unwrap_or(""), tag.name);
    let hint = creation_hint(parent_path.as_deref());

    tracing::info!(
        tag_id = tag.id,
        name = %tag.name,
        parent_id = ?tag.parent_id,
        user_id = auth.user_id,
        "Tag created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: TagWithPath {
                tag,
                path,
                hint: Some(hint),
            },
        }),
    ))
}

/// PUT /tags/{name}
///
/// Edit a tag. `parent_name: ""` moves the tag to the root; moving a tag
/// under itself or one of its descendants is rejected. An empty `wiki_page`
/// or `icon` clears that field.
pub async fn update_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(input): Json<UpdateTag>,
) -> AppResult<impl IntoResponse> {
    let tag = ensure_tag(&state.pool, &name).await?;

    let new_name = input.name.as_deref().map(str::trim);
    if let Some(n) = new_name {
        validate_tag_name(n)?;
    }

    let parent_id = match input.parent_name.as_deref().map(str::trim) {
        None => None,
        Some("") => Some(None),
        Some(parent_name) => {
            let parent = ensure_tag_named(&state.pool, parent_name).await?;
            let chain = TagRepo::ancestors(&state.pool, parent.id).await?;
            if would_create_cycle(tag.id, &chain) {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "Cannot move '{}' under '{}': it would create a cycle",
                    tag.name, parent.name
                ))));
            }
            Some(Some(parent.id))
        }
    };
    let wiki_page_id = match input.wiki_page.as_deref().map(str::trim) {
        None => None,
        Some(title) => Some(wiki_page_id(&state.pool, Some(title)).await?),
    };
    let icon = input
        .icon
        .as_deref()
        .map(|icon| Some(icon.trim()).filter(|i| !i.is_empty()));

    let changes = TagChanges {
        name: new_name,
        parent_id,
        wiki_page_id,
        categories: input.categories.as_deref(),
        icon,
    };
    let updated = TagRepo::update(&state.pool, tag.id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tag",
            id: tag.id,
        }))?;
    let path = tag_path(&state.pool, updated.id).await?;

    tracing::info!(tag_id = updated.id, user_id = auth.user_id, "Tag updated");

    Ok(Json(DataResponse {
        data: TagWithPath {
            tag: updated,
            path,
            hint: None,
        },
    }))
}

/// DELETE /tags/{name}
///
/// Delete a tag; its children move up to the tag's own parent.
pub async fn delete_tag(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tag = ensure_tag(&state.pool, &name).await?;
    let reparented = TagRepo::delete_reparenting(&state.pool, tag.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tag",
            id: tag.id,
        }))?;

    tracing::info!(
        tag_id = tag.id,
        reparented,
        user_id = auth.user_id,
        "Tag deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
