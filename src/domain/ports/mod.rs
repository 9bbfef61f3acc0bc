use crate::domain::models::{
    user::User, room::Room, booking::{Booking, BookingWithNames},
    auth::RefreshTokenRecord,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: &Room) -> Result<Room, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Room>, AppError>;
    async fn list(&self) -> Result<Vec<Room>, AppError>;
    async fn update(&self, room: &Room) -> Result<Room, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persists the booking unless it overlaps an existing booking for the
    /// same room. The overlap check and the insert run in one transaction
    /// serialized per room, so two concurrent requests cannot double-book.
    async fn insert_if_free(&self, booking: &Booking) -> Result<Booking, AppError>;
    /// Writes the new room/interval after re-checking the target room for
    /// overlaps, excluding the booking itself. Same transactional guarantee
    /// as `insert_if_free`.
    async fn update_if_free(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_with_names(&self) -> Result<Vec<BookingWithNames>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn count_by_room(&self, room_id: &str) -> Result<i64, AppError>;
    async fn count_by_user(&self, user_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}
