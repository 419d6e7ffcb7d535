use axum::{routing::get, Router};

use crate::types::app_state::AppState;

mod get_place_predictions;
mod get_widget_page;

pub fn apply_routes(app: Router<AppState>) -> Router<AppState> {
    app.route("/", get(get_widget_page::get_widget_page)).route(
        "/place-predictions",
        get(get_place_predictions::get_place_predictions),
    )
}
