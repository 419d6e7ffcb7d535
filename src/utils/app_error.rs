use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::places::types::places_service_error::PlacesServiceError;

/// Error returned by the demo server's handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// The Places web service failed. Details are logged, not returned.
    #[error("Failed to fetch place predictions")]
    PlacesUnavailable(#[from] PlacesServiceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AppError::PlacesUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidQuery(_) => "invalid_query",
            AppError::PlacesUnavailable(_) => "places_unavailable",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response<Body> {
        (
            self.status(),
            Json(ErrorBody {
                error: self.kind(),
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
