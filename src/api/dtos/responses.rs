use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::{booking::BookingWithNames, user::User};

/// User payload as served by the API. Never carries the password hash.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Booking entry in the shape the calendar frontend consumes.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub extended_props: CalendarEventProps,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventProps {
    pub user_name: String,
    pub room_name: String,
}

impl From<BookingWithNames> for CalendarEvent {
    fn from(row: BookingWithNames) -> Self {
        Self {
            id: row.id,
            title: format!("{} ({})", row.title, row.room_name),
            start: row.start_time,
            end: row.end_time,
            extended_props: CalendarEventProps {
                user_name: row.user_name,
                room_name: row.room_name,
            },
        }
    }
}
