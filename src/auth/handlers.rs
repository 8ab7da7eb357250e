use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{
        AuthResponse, LoginPayload, MessageResponse, ProfileResponse, RefreshPayload,
        SignupPayload, UserProfile,
    },
    extractors::CurrentUser,
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo,
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(profile))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let new_user = payload.validate()?;

    if repo::find_by_email(&state.db, &new_user.email).await?.is_some() {
        warn!(email = %new_user.email, "email already registered");
        return Err(ApiError::Conflict("User already exists"));
    }

    let password_hash = hash_password(&new_user.password)?;
    let user = repo::create(&state.db, &new_user.name, &new_user.email, &password_hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;
    repo::set_refresh_token(&state.db, user.id, Some(&refresh_token)).await?;

    info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            access_token,
            refresh_token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (email, password) = payload.validate()?;

    // Unknown email and wrong password produce the same response.
    let user = repo::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| {
            warn!(email = %email, "login with unknown email");
            ApiError::Unauthorized("Invalid credentials")
        })?;

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;
    repo::set_refresh_token(&state.db, user.id, Some(&refresh_token)).await?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    let presented = payload.validate()?;

    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(presented)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token"))?;

    let user = repo::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::Unauthorized("User not found"))?;

    // A token that no longer matches the stored value has been rotated away
    // or invalidated by logout.
    if user.refresh_token.as_deref() != Some(presented) {
        warn!(user_id = %user.id, "refresh token does not match stored value");
        return Err(ApiError::Unauthorized("Refresh token revoked"));
    }

    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;
    repo::set_refresh_token(&state.db, user.id, Some(&refresh_token)).await?;

    info!(user_id = %user.id, "tokens refreshed");
    Ok(Json(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    }))
}

#[instrument(skip(state, current_user))]
pub async fn logout(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<MessageResponse>, ApiError> {
    repo::set_refresh_token(&state.db, current_user.id, None).await?;
    info!(user_id = %current_user.id, "user logged out");
    Ok(Json(MessageResponse {
        message: "Logout successful",
    }))
}

#[instrument(skip(state, current_user))]
pub async fn profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = repo::find_by_id(&state.db, current_user.id)
        .await?
        .ok_or(ApiError::Unauthorized("User not found"))?;

    Ok(Json(ProfileResponse {
        user: UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        },
    }))
}
