use crate::domain::{models::booking::{Booking, BookingWithNames}, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {

    async fn insert_if_free(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        // Row lock on the room serializes concurrent writers for that room.
        let room = sqlx::query("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
            .bind(&booking.room_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        if room.is_none() { return Err(AppError::NotFound("Room not found".into())); }

        let overlapping = sqlx::query("SELECT COUNT(*) as count FROM bookings WHERE room_id = $1 AND start_time < $2 AND end_time > $3")
            .bind(&booking.room_id).bind(booking.end_time).bind(booking.start_time)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        if overlapping.get::<i64, _>("count") > 0 {
            return Err(AppError::Conflict("The room is already booked for this time slot".to_string()));
        }

        let created = sqlx::query_as::<_, Booking>("INSERT INTO bookings (id, title, user_id, room_id, start_time, end_time, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *")
            .bind(&booking.id).bind(&booking.title).bind(&booking.user_id).bind(&booking.room_id)
            .bind(booking.start_time).bind(booking.end_time).bind(booking.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn update_if_free(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let room = sqlx::query("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
            .bind(&booking.room_id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        if room.is_none() { return Err(AppError::NotFound("Room not found".into())); }

        let overlapping = sqlx::query("SELECT COUNT(*) as count FROM bookings WHERE room_id = $1 AND id != $2 AND start_time < $3 AND end_time > $4")
            .bind(&booking.room_id).bind(&booking.id).bind(booking.end_time).bind(booking.start_time)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        if overlapping.get::<i64, _>("count") > 0 {
            return Err(AppError::Conflict("The room is already booked for this time slot".to_string()));
        }

        let updated = sqlx::query_as::<_, Booking>("UPDATE bookings SET title=$1, room_id=$2, start_time=$3, end_time=$4 WHERE id=$5 RETURNING *")
            .bind(&booking.title).bind(&booking.room_id).bind(booking.start_time).bind(booking.end_time).bind(&booking.id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET title=$1, room_id=$2, start_time=$3, end_time=$4 WHERE id=$5 RETURNING *")
            .bind(&booking.title).bind(&booking.room_id).bind(booking.start_time).bind(booking.end_time).bind(&booking.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_with_names(&self) -> Result<Vec<BookingWithNames>, AppError> {
        sqlx::query_as::<_, BookingWithNames>(
            "SELECT b.id, b.title, b.start_time, b.end_time, u.name AS user_name, r.name AS room_name
             FROM bookings b
             JOIN users u ON u.id = b.user_id
             JOIN rooms r ON r.id = b.room_id
             ORDER BY b.start_time ASC"
        )
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Booking not found".into())); }
        Ok(())
    }

    async fn count_by_room(&self, room_id: &str) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM bookings WHERE room_id = $1").bind(room_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }

    async fn count_by_user(&self, user_id: &str) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM bookings WHERE user_id = $1").bind(user_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }
}
