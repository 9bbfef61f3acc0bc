use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info};
use crate::state::AppState;

const SWEEP_INTERVAL_SECS: u64 = 3600;

/// Periodically removes refresh tokens whose expiry has passed so the
/// table does not grow without bound.
pub async fn start_token_sweeper(state: Arc<AppState>) {
    info!("Starting refresh token sweeper...");

    loop {
        match state.auth_repo.delete_expired(Utc::now()).await {
            Ok(purged) if purged > 0 => info!("Purged {} expired refresh tokens", purged),
            Ok(_) => {}
            Err(e) => error!("Failed to purge expired refresh tokens: {:?}", e),
        }
        sleep(Duration::from_secs(SWEEP_INTERVAL_SECS)).await;
    }
}
