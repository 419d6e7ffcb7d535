use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map};
use tracing::error;
use validator::Validate;

use crate::{
    services::places::places_service::AutocompleteSearchInput,
    types::{app_state::AppState, autocomplete_options::AutocompleteOptions},
    utils::{app_error::AppError, validated_query::ValidatedQuery},
};

#[derive(Validate, Deserialize)]
pub struct GetPlacePredictionsPayload {
    #[validate(length(min = 1, message = "Must be at least 1 character"))]
    pub search: String,

    #[validate(length(equal = 2, message = "Must be a two letter country code"))]
    pub country: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct GetPlacePredictionsResponseDataPrediction {
    pub description: String,
    pub main_text: String,
    pub secondary_text: String,
    pub place_id: String,
}

#[derive(Serialize, Deserialize)]
pub struct GetPlacePredictionsResponseData {
    pub predictions: Vec<GetPlacePredictionsResponseDataPrediction>,
}

#[derive(Serialize, Deserialize)]
pub struct GetPlacePredictionsResponse {
    pub data: GetPlacePredictionsResponseData,
}

/// Address suggestions with the widget's default options, optionally for a
/// different country.
pub async fn get_place_predictions(
    State(state): State<AppState>,
    ValidatedQuery(GetPlacePredictionsPayload { search, country }): ValidatedQuery<
        GetPlacePredictionsPayload,
    >,
) -> Result<Response, AppError> {
    let mut options = AutocompleteOptions::widget_default();
    if let Some(country) = country {
        let mut restrictions = Map::new();
        restrictions.insert("country".to_string(), json!(country.to_lowercase()));
        options.component_restrictions = Some(restrictions);
    }

    let predictions = state
        .places_service
        .get_autocomplete(AutocompleteSearchInput {
            input: search,
            options,
        })
        .await
        .map_err(|e| {
            error!("Failed to fetch place predictions: {}", e);
            AppError::from(e)
        })?;

    Ok(Json(GetPlacePredictionsResponse {
        data: GetPlacePredictionsResponseData {
            predictions: predictions
                .predictions
                .into_iter()
                .map(|p| GetPlacePredictionsResponseDataPrediction {
                    description: p.description,
                    main_text: p.main_text,
                    secondary_text: p.secondary_text,
                    place_id: p.place_id,
                })
                .collect(),
        },
    })
    .into_response())
}
