use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{normalize_email, validate_name, validate_password},
        extractors::{CurrentUser, SuperUser},
        password::hash_password,
        repo::User,
    },
    error::ApiError,
    state::AppState,
    users::dto::{UserRead, UserUpdate},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me).patch(update_me))
        .route("/protected-route", get(protected_route))
        .route("/admin-only", get(admin_only))
        .route("/profile", get(profile))
        .route(
            "/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

#[instrument(skip_all)]
async fn me(CurrentUser(user): CurrentUser) -> Json<UserRead> {
    Json(UserRead::from(user))
}

#[instrument(skip_all)]
async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(patch): Json<UserUpdate>,
) -> Result<Json<UserRead>, ApiError> {
    let updated = apply_user_patch(&state, user, patch).await?;
    Ok(Json(UserRead::from(updated)))
}

#[instrument(skip_all)]
async fn protected_route(CurrentUser(user): CurrentUser) -> Json<Value> {
    let full_name = [user.first_name.as_deref(), user.last_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    Json(json!({
        "message": format!("Hello {}!", user.email),
        "user_id": user.id,
        "full_name": full_name,
    }))
}

#[instrument(skip_all)]
async fn admin_only(SuperUser(user): SuperUser) -> Json<Value> {
    Json(json!({
        "message": "superuser access granted",
        "admin_email": user.email,
    }))
}

#[instrument(skip_all)]
async fn profile(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({
        "profile": {
            "id": user.id,
            "email": user.email,
            "first_name": user.first_name,
            "last_name": user.last_name,
            "is_verified": user.is_verified,
        }
    }))
}

// --- superuser management ---

#[instrument(skip(state, _admin))]
async fn get_user(
    State(state): State<AppState>,
    _admin: SuperUser,
    Path(id): Path<i64>,
) -> Result<Json<UserRead>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(UserRead::from(user)))
}

#[instrument(skip(state, _admin, patch))]
async fn update_user(
    State(state): State<AppState>,
    _admin: SuperUser,
    Path(id): Path<i64>,
    Json(patch): Json<UserUpdate>,
) -> Result<Json<UserRead>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    let updated = apply_user_patch(&state, user, patch).await?;
    Ok(Json(UserRead::from(updated)))
}

#[instrument(skip(state, _admin))]
async fn delete_user(
    State(state): State<AppState>,
    _admin: SuperUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !User::deactivate(&state.db, id).await? {
        return Err(ApiError::NotFound("user"));
    }
    info!(user_id = id, "user deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a partial update to a loaded user row: only fields present in the
/// request change, each re-validated the same way as at registration.
async fn apply_user_patch(
    state: &AppState,
    mut user: User,
    patch: UserUpdate,
) -> Result<User, ApiError> {
    if let Some(email) = patch.email {
        let email = normalize_email(&email)?;
        if email != user.email {
            if User::find_by_email(&state.db, &email).await?.is_some() {
                warn!(user_id = user.id, "email change collides with existing user");
                return Err(ApiError::bad_request(
                    "UPDATE_USER_EMAIL_ALREADY_EXISTS",
                    "a user with this email already exists",
                ));
            }
            user.email = email;
        }
    }
    if let Some(password) = patch.password {
        validate_password(&password)?;
        user.hashed_password = hash_password(&password)?;
    }
    if let Some(first_name) = patch.first_name {
        validate_name("first_name", Some(&first_name))?;
        user.first_name = Some(first_name);
    }
    if let Some(last_name) = patch.last_name {
        validate_name("last_name", Some(&last_name))?;
        user.last_name = Some(last_name);
    }

    Ok(user.update(&state.db).await?)
}
