use axum::Router;
use tower_http::cors::CorsLayer;

use crate::{
    routes::apply_routes,
    services::{
        places::places_service::{PlacesService, PlacesServiceConfig},
        script_loader::GOOGLE_MAPS_HOST,
    },
    types::app_state::AppState,
};

#[derive(Clone)]
pub struct AppConfig {
    pub maps_host: String,
    pub api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads `GOOGLE_MAPS_HOST` and `GOOGLE_MAPS_API_KEY`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            maps_host: lookup("GOOGLE_MAPS_HOST").unwrap_or_else(|| GOOGLE_MAPS_HOST.to_string()),
            api_key: lookup("GOOGLE_MAPS_API_KEY").filter(|key| !key.is_empty()),
        }
    }
}

pub fn gen_app(config: AppConfig) -> Router {
    let cors_middleware = CorsLayer::new();
    let state = AppState {
        places_service: PlacesService::new(PlacesServiceConfig {
            api_key: config.api_key.clone().unwrap_or_default(),
            host: config.maps_host.clone(),
        }),
        api_key: config.api_key,
        script_host: config.maps_host,
    };

    apply_routes(Router::new())
        .layer(cors_middleware)
        .with_state(state)
}

#[cfg(test)]
pub struct MockApp {
    pub app: Router,
    pub google_server: mockito::ServerGuard,
}

#[cfg(test)]
pub async fn gen_mock_app() -> MockApp {
    let google_server = mockito::Server::new_async().await;

    let app = gen_app(AppConfig {
        maps_host: google_server.url(),
        api_key: Some("key".to_string()),
    });

    MockApp { app, google_server }
}
