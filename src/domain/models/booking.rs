use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub title: String,
    pub user_id: String,
    pub room_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub title: String,
    pub user_id: String,
    pub room_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            user_id: params.user_id,
            room_id: params.room_id,
            start_time: params.start,
            end_time: params.end,
            created_at: Utc::now(),
        }
    }
}

/// Booking row joined with the owning user's and room's display names,
/// as served by the calendar feed.
#[derive(Debug, FromRow, Clone)]
pub struct BookingWithNames {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub user_name: String,
    pub room_name: String,
}
