//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use biowiki_core::error::CoreError;
use biowiki_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Anonymous requests (no header at all) are rejected with 403 Forbidden; a
/// malformed, invalid, or expired token is rejected with 401 Unauthorized.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name.
    pub role: String,
}

impl AuthUser {
    /// Fail with Forbidden unless this user is `author_id`.
    pub fn ensure_author(&self, author_id: DbId, entity: &str) -> Result<(), AppError> {
        if self.user_id != author_id {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Only the author may modify this {entity}"
            ))));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state)?.ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "Authentication required for this action".into(),
            ))
        })
    }
}

/// Authenticated user if a token was supplied, `None` for anonymous requests.
///
/// A supplied but invalid token is still rejected with 401.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn user_id(&self) -> Option<DbId> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(authenticate(parts, state)?))
    }
}

/// Decode the bearer token, if any, into an [`AuthUser`].
fn authenticate(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, AppError> {
    let Some(auth_header) = parts.headers.get("authorization") else {
        return Ok(None);
    };

    let token = auth_header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    Ok(Some(AuthUser {
        user_id: claims.sub,
        role: claims.role,
    }))
}
