use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Only `formatted_address` is read by the widget. Everything else the service
/// sent is kept in `other` so callers receive the result unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl PlaceResult {
    pub fn with_address(formatted_address: &str) -> Self {
        Self {
            formatted_address: Some(formatted_address.to_string()),
            ..Default::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.other.get(key)
    }
}
