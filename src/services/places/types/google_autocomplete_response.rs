use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct GoogleAutocompleteResponsePredictionStructuredFormatting {
    pub main_text: String,
    #[serde(default)]
    pub secondary_text: String,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleAutocompleteResponsePrediction {
    pub place_id: String,
    #[serde(default)]
    pub description: String,
    pub structured_formatting: GoogleAutocompleteResponsePredictionStructuredFormatting,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleAutocompleteResponse {
    #[serde(default)]
    pub predictions: Vec<GoogleAutocompleteResponsePrediction>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
