use serde::{Deserialize, Serialize};

use crate::types::place_result::PlaceResult;

#[derive(Serialize, Deserialize)]
pub struct GooglePlaceDetailsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PlaceResult>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
