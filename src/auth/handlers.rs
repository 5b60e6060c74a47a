use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        claims::TokenPurpose,
        dto::{
            normalize_email, validate_name, validate_password, ForgotPasswordRequest, LoginForm,
            RegisterRequest, RequestVerifyTokenRequest, ResetPasswordRequest, TokenResponse,
            VerifyRequest,
        },
        hooks,
        jwt::JwtKeys,
        password::{hash_password, password_fingerprint, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
    users::dto::UserRead,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/jwt/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/request-verify-token", post(request_verify_token))
        .route("/verify", post(verify))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserRead>), ApiError> {
    let email = normalize_email(&payload.email)?;
    validate_password(&payload.password)?;
    validate_name("first_name", payload.first_name.as_deref())?;
    validate_name("last_name", payload.last_name.as_deref())?;

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::bad_request(
            "REGISTER_USER_ALREADY_EXISTS",
            "a user with this email already exists",
        ));
    }

    let hashed = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        &email,
        &hashed,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
    )
    .await?;

    hooks::on_after_register(&user);
    Ok((StatusCode::CREATED, Json(UserRead::from(user))))
}

#[instrument(skip(state, form))]
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let bad_credentials = || {
        ApiError::bad_request("LOGIN_BAD_CREDENTIALS", "invalid credentials")
    };

    let email = form.username.trim().to_lowercase();
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "login with unknown email");
            bad_credentials()
        })?;

    if !verify_password(&form.password, &user.hashed_password)? {
        warn!(user_id = user.id, "login with wrong password");
        return Err(bad_credentials());
    }
    if !user.is_active {
        warn!(user_id = user.id, "login for inactive user");
        return Err(bad_credentials());
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// Always answers 202, whether or not the email is known: the response must
/// not reveal which addresses have accounts.
#[instrument(skip(state, payload))]
async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if let Some(user) = User::find_by_email(&state.db, &email).await? {
        if user.is_active {
            let keys = JwtKeys::from_ref(&state);
            let token = keys.sign_reset(user.id, password_fingerprint(&user.hashed_password))?;
            hooks::on_after_forgot_password(&user, &token);
        }
    }
    Ok(StatusCode::ACCEPTED)
}

#[instrument(skip(state, payload))]
async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let bad_token = || {
        ApiError::bad_request("RESET_PASSWORD_BAD_TOKEN", "invalid or expired reset token")
    };

    validate_password(&payload.password)?;

    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_purpose(&payload.token, TokenPurpose::Reset)
        .map_err(|_| bad_token())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(bad_token)?;

    // Single use: the fingerprint was computed from the hash current at
    // issue time, so any password change since then voids the token.
    if claims.fingerprint.as_deref() != Some(password_fingerprint(&user.hashed_password).as_str())
    {
        warn!(user_id = user.id, "reset token fingerprint mismatch");
        return Err(bad_token());
    }

    let hashed = hash_password(&payload.password)?;
    User::set_password(&state.db, user.id, &hashed).await?;
    Ok(StatusCode::OK)
}

/// Always answers 202; a token is only actually issued for an active,
/// not-yet-verified account.
#[instrument(skip(state, payload))]
async fn request_verify_token(
    State(state): State<AppState>,
    Json(payload): Json<RequestVerifyTokenRequest>,
) -> Result<StatusCode, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if let Some(user) = User::find_by_email(&state.db, &email).await? {
        if user.is_active && !user.is_verified {
            let keys = JwtKeys::from_ref(&state);
            let token = keys.sign_verify(user.id, user.email.clone())?;
            hooks::on_after_request_verify(&user, &token);
        }
    }
    Ok(StatusCode::ACCEPTED)
}

#[instrument(skip(state, payload))]
async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<UserRead>, ApiError> {
    let bad_token = || {
        ApiError::bad_request("VERIFY_USER_BAD_TOKEN", "invalid or expired verification token")
    };

    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_purpose(&payload.token, TokenPurpose::Verify)
        .map_err(|_| bad_token())?;

    let mut user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(bad_token)?;

    // The token is bound to the email it was requested for
    if claims.email.as_deref() != Some(user.email.as_str()) {
        warn!(user_id = user.id, "verify token email mismatch");
        return Err(bad_token());
    }

    if user.is_verified {
        return Err(ApiError::bad_request(
            "VERIFY_USER_ALREADY_VERIFIED",
            "user is already verified",
        ));
    }

    User::mark_verified(&state.db, user.id).await?;
    user.is_verified = true;
    Ok(Json(UserRead::from(user)))
}
