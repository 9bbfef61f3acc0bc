use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateRoomRequest, UpdateRoomRequest};
use crate::domain::models::room::Room;
use crate::domain::services::policy;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::info;

fn require_admin(user: &AuthUser) -> Result<(), AppError> {
    if !policy::is_admin(&user.0) {
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().len() < 3 {
        return Err(AppError::Validation("Room name must be at least 3 characters".into()));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> Result<(), AppError> {
    if capacity <= 0 {
        return Err(AppError::Validation("Capacity must be a positive number".into()));
    }
    Ok(())
}

fn validate_room_type(room_type: &str) -> Result<(), AppError> {
    if room_type.trim().len() < 3 {
        return Err(AppError::Validation("Room type must be at least 3 characters".into()));
    }
    Ok(())
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&user)?;

    validate_name(&payload.name)?;
    validate_capacity(payload.capacity)?;
    validate_room_type(&payload.room_type)?;

    let room = Room::new(payload.name, payload.capacity, payload.room_type, payload.location);
    let created = state.room_repo.create(&room).await?;

    info!("Room created: {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&user)?;

    let rooms = state.room_repo.list().await?;
    Ok(Json(rooms))
}

pub async fn update_room(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(room_id): Path<String>,
    Json(payload): Json<UpdateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&user)?;

    let mut room = state.room_repo.find_by_id(&room_id).await?
        .ok_or(AppError::NotFound("Room not found".into()))?;

    if let Some(name) = payload.name {
        validate_name(&name)?;
        room.name = name;
    }
    if let Some(capacity) = payload.capacity {
        validate_capacity(capacity)?;
        room.capacity = capacity;
    }
    if let Some(room_type) = payload.room_type {
        validate_room_type(&room_type)?;
        room.room_type = room_type;
    }
    if let Some(location) = payload.location {
        room.location = Some(location);
    }
    room.updated_at = Utc::now();

    let updated = state.room_repo.update(&room).await?;
    info!("Room updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&user)?;

    let room = state.room_repo.find_by_id(&room_id).await?
        .ok_or(AppError::NotFound("Room not found".into()))?;

    let bookings = state.booking_repo.count_by_room(&room.id).await?;
    if bookings > 0 {
        return Err(AppError::Conflict("Room has associated bookings; remove them first".into()));
    }

    state.room_repo.delete(&room.id).await?;

    info!("Room deleted: {}", room_id);
    Ok(StatusCode::NO_CONTENT)
}
