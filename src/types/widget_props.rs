use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::Value;

use super::place_result::PlaceResult;

pub const ON_PLACE_SELECTED: &str = "onPlaceSelected";
pub const TYPES: &str = "types";
pub const COMPONENT_RESTRICTIONS: &str = "componentRestrictions";
pub const BOUNDS: &str = "bounds";
pub const FIELDS: &str = "fields";
pub const OPTIONS: &str = "options";
pub const API_KEY: &str = "apiKey";
pub const INPUT_AUTOCOMPLETE_VALUE: &str = "inputAutocompleteValue";

pub type PropMap = BTreeMap<String, Value>;

pub type PlaceSelectedHandler = Arc<dyn Fn(PlaceResult) + Send + Sync>;

#[derive(Clone, Default)]
pub struct WidgetProps {
    properties: PropMap,
    on_place_selected: Option<PlaceSelectedHandler>,
}

impl WidgetProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_properties(properties: PropMap) -> Self {
        Self {
            properties,
            on_place_selected: None,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn on_place_selected<F>(mut self, handler: F) -> Self
    where
        F: Fn(PlaceResult) + Send + Sync + 'static,
    {
        self.on_place_selected = Some(Arc::new(handler));
        self
    }

    pub fn properties(&self) -> &PropMap {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// A property counts as supplied unless it is missing or `null`.
    pub fn supplied(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }

    /// The API key, if one was given. An empty string counts as no key.
    pub fn api_key(&self) -> Option<&str> {
        self.supplied(API_KEY)
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
    }

    pub fn place_selected_handler(&self) -> Option<PlaceSelectedHandler> {
        self.on_place_selected.clone()
    }
}

impl fmt::Debug for WidgetProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetProps")
            .field("properties", &self.properties)
            .field("on_place_selected", &self.on_place_selected.is_some())
            .finish()
    }
}
