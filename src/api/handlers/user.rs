use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateUserRequest, UpdateUserRequest};
use crate::api::dtos::responses::UserResponse;
use crate::domain::models::user::{User, ROLE_ADMIN};
use crate::domain::services::policy;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
use rand::rngs::OsRng;
use tracing::{info, error};

const DEFAULT_RESET_PASSWORD: &str = "123456";

fn require_admin(user: &AuthUser) -> Result<(), AppError> {
    if !policy::is_admin(&user.0) {
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().len() < 3 {
        return Err(AppError::Validation("Name must be at least 3 characters".into()));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if !email.contains('@') || email.trim().len() < 3 {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 6 {
        return Err(AppError::Validation("Password must be at least 6 characters".into()));
    }
    Ok(())
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    admin: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    validate_name(&payload.name)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    if !User::is_valid_role(&payload.role) {
        return Err(AppError::Validation("Unknown role".into()));
    }

    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already in use".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let user = User::new(payload.name, payload.email, password_hash, payload.role);
    let created = state.user_repo.create(&user).await?;

    info!("Created user: {}", created.id);
    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    admin: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    let users = state.user_repo.list().await?;
    let safe_users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(safe_users))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    admin: AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    // An admin may not demote themselves and lose access to this panel.
    if admin.0.id == user_id && payload.role != ROLE_ADMIN {
        return Err(AppError::Validation("You cannot change your own role".into()));
    }

    validate_name(&payload.name)?;
    validate_email(&payload.email)?;
    if !User::is_valid_role(&payload.role) {
        return Err(AppError::Validation("Unknown role".into()));
    }

    let mut user = state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    user.name = payload.name;
    user.email = payload.email;
    user.role = payload.role;
    user.updated_at = Utc::now();

    let updated = state.user_repo.update(&user).await?;
    info!("User updated: {}", updated.id);
    Ok(Json(UserResponse::from(updated)))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    admin: AuthUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    if admin.0.id == user_id {
        return Err(AppError::Validation("You cannot delete your own account".into()));
    }

    let target = state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let bookings = state.booking_repo.count_by_user(&target.id).await?;
    if bookings > 0 {
        return Err(AppError::Conflict("User has associated bookings; remove them first".into()));
    }

    match state.user_repo.delete(&target.id).await {
        Ok(_) => {
            info!("Deleted user {}", user_id);
            Ok(StatusCode::NO_CONTENT)
        },
        Err(e) => {
            error!("Failed to delete user {}: {:?}", user_id, e);
            Err(e)
        }
    }
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    admin: AuthUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&admin)?;

    if admin.0.id == user_id {
        return Err(AppError::Validation("You cannot reset your own password from this panel".into()));
    }

    let target = state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(DEFAULT_RESET_PASSWORD.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    state.user_repo.update_password(&target.id, &password_hash).await?;

    info!("Password reset for user {}", user_id);
    Ok(Json(serde_json::json!({ "message": "Password has been reset to the default" })))
}
