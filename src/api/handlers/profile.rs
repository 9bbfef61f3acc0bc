use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{ChangePasswordRequest, UpdateProfileRequest};
use crate::api::dtos::responses::UserResponse;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use argon2::{password_hash::{SaltString, PasswordHasher}, PasswordHash, Argon2, PasswordVerifier};
use rand::rngs::OsRng;
use tracing::info;

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().len() < 3 {
        return Err(AppError::Validation("Name must be at least 3 characters".into()));
    }
    if !payload.email.contains('@') || payload.email.trim().len() < 3 {
        return Err(AppError::Validation("Invalid email address".into()));
    }

    let mut current = state.user_repo.find_by_id(&user.0.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    current.name = payload.name;
    current.email = payload.email;
    current.updated_at = Utc::now();

    let updated = state.user_repo.update(&current).await?;
    info!("Profile updated: {}", updated.id);
    Ok(Json(UserResponse::from(updated)))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.new_password.len() < 6 {
        return Err(AppError::Validation("Password must be at least 6 characters".into()));
    }

    let current = state.user_repo.find_by_id(&user.0.id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let parsed_hash = PasswordHash::new(&current.password_hash)
        .map_err(|_| AppError::Internal)?;

    if Argon2::default().verify_password(payload.current_password.as_bytes(), &parsed_hash).is_err() {
        return Err(AppError::Validation("Current password is incorrect".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.new_password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    state.user_repo.update_password(&current.id, &password_hash).await?;

    info!("Password changed for user: {}", current.id);
    Ok(Json(serde_json::json!({ "message": "Password updated" })))
}
