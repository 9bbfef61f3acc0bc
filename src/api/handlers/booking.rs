use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateBookingRequest, UpdateBookingRequest};
use crate::api::dtos::responses::CalendarEvent;
use crate::domain::models::booking::{Booking, NewBookingParams};
use crate::domain::services::{policy, scheduling};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.booking_repo.list_with_names().await?;
    let events: Vec<CalendarEvent> = rows.into_iter().map(CalendarEvent::from).collect();
    Ok(Json(events))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.trim().len() < 3 {
        return Err(AppError::Validation("Title must be at least 3 characters".into()));
    }
    scheduling::validate_interval(payload.start_time, payload.end_time)?;

    state.room_repo.find_by_id(&payload.room_id).await?
        .ok_or(AppError::NotFound("Room not found".into()))?;

    let booking = Booking::new(NewBookingParams {
        title: payload.title,
        user_id: user.0.id,
        room_id: payload.room_id,
        start: payload.start_time,
        end: payload.end_time,
    });

    let created = state.booking_repo.insert_if_free(&booking).await?;

    info!("Booking created: {} for room {}", created.id, created.room_id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if !policy::can_modify_booking(&user.0, &booking) {
        return Err(AppError::Forbidden("You may only modify your own bookings".into()));
    }

    let original_room = booking.room_id.clone();
    let original_interval = (booking.start_time, booking.end_time);

    if let Some(title) = payload.title {
        if title.trim().len() < 3 {
            return Err(AppError::Validation("Title must be at least 3 characters".into()));
        }
        booking.title = title;
    }
    if let Some(start) = payload.start_time {
        booking.start_time = start;
    }
    if let Some(end) = payload.end_time {
        booking.end_time = end;
    }
    if let Some(room_id) = payload.room_id {
        if room_id != booking.room_id {
            state.room_repo.find_by_id(&room_id).await?
                .ok_or(AppError::NotFound("Room not found".into()))?;
        }
        booking.room_id = room_id;
    }

    scheduling::validate_interval(booking.start_time, booking.end_time)?;

    // The post-patch room and interval are what must satisfy the no-overlap
    // invariant; a title-only change cannot introduce a conflict.
    let needs_recheck = booking.room_id != original_room
        || (booking.start_time, booking.end_time) != original_interval;

    let updated = if needs_recheck {
        state.booking_repo.update_if_free(&booking).await?
    } else {
        state.booking_repo.update(&booking).await?
    };

    info!("Booking updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if !policy::can_modify_booking(&user.0, &booking) {
        return Err(AppError::Forbidden("You may only cancel your own bookings".into()));
    }

    state.booking_repo.delete(&booking.id).await?;

    info!("Booking cancelled: {}", booking_id);
    Ok(StatusCode::NO_CONTENT)
}
