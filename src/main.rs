#[tokio::main]
async fn main() {
    room_booking_backend::run().await;
}
