use std::sync::Arc;
use crate::domain::ports::{AuthRepository, BookingRepository, RoomRepository, UserRepository};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub room_repo: Arc<dyn RoomRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
}
