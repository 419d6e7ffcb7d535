use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacesServiceError {
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Places API responded with {status}: {message}")]
    Status { status: String, message: String },
}
