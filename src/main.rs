use std::env;

use places_widget::app::{gen_app, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    info!("Starting places widget demo...");

    let config = AppConfig::from_env();
    if config.api_key.is_none() {
        info!("GOOGLE_MAPS_API_KEY is not set, the page will not load the places script");
    }
    let app = gen_app(config);

    let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .expect("Failed to bind listener");
    info!("Listening on {}", bind_address);
    axum::serve(listener, app).await.expect("Server error");
}
