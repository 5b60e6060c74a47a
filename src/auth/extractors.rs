use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::{
    auth::{
        claims::TokenPurpose,
        jwt::JwtKeys,
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

/// Guard for routes that require any active, authenticated user. Resolves
/// the bearer access token to a full user row.
pub struct CurrentUser(pub User);

/// Guard layered on top of [`CurrentUser`] for admin-only routes.
pub struct SuperUser(pub User);

async fn resolve_user(parts: &mut Parts, state: &AppState) -> Result<User, ApiError> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized("missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .ok_or(ApiError::Unauthorized("invalid Authorization header"))?;

    let keys = JwtKeys::from_ref(state);
    let claims = keys
        .verify_purpose(token, TokenPurpose::Access)
        .map_err(|_| {
            warn!("invalid or expired access token");
            ApiError::Unauthorized("invalid or expired token")
        })?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::Unauthorized("invalid or expired token"))?;

    if !user.is_active {
        return Err(ApiError::Unauthorized("inactive user"));
    }

    Ok(user)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(resolve_user(parts, state).await?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SuperUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_user(parts, state).await?;
        if !user.is_superuser {
            return Err(ApiError::Forbidden("superuser required"));
        }
        Ok(SuperUser(user))
    }
}
