use crate::services::places::places_service::PlacesService;

#[derive(Clone)]
pub struct AppState {
    pub places_service: PlacesService,
    pub api_key: Option<String>,
    pub script_host: String,
}
