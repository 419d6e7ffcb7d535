use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::widget_props::{WidgetProps, FIELDS, OPTIONS};
use crate::utils::widget_error::WidgetError;

pub const DEFAULT_FIELDS: [&str; 4] = [
    "address_components",
    "geometry.location",
    "place_id",
    "formatted_address",
];

pub fn default_fields() -> Vec<String> {
    DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_restrictions: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AutocompleteOptions {
    pub fn widget_default() -> Self {
        let mut restrictions = Map::new();
        restrictions.insert("country".to_string(), json!("us"));

        Self {
            component_restrictions: Some(restrictions),
            types: Some(vec!["address".to_string()]),
            ..Default::default()
        }
    }

    /// Countries from `componentRestrictions.country`, which may be a single
    /// code or a list of codes.
    pub fn countries(&self) -> Vec<String> {
        match self
            .component_restrictions
            .as_ref()
            .and_then(|r| r.get("country"))
        {
            Some(Value::String(country)) => vec![country.clone()],
            Some(Value::Array(countries)) => countries
                .iter()
                .filter_map(|c| c.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub fields: Vec<String>,
    pub options: AutocompleteOptions,
}

impl EffectiveConfig {
    /// Defaults fill in only for properties the caller left out. A supplied
    /// `options` object replaces the default object entirely.
    pub fn resolve(props: &WidgetProps) -> Result<Self, WidgetError> {
        let fields = match props.supplied(FIELDS) {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|source| WidgetError::InvalidProperty { key: FIELDS, source })?,
            None => default_fields(),
        };

        let options = match props.supplied(OPTIONS) {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|source| WidgetError::InvalidProperty { key: OPTIONS, source })?,
            None => AutocompleteOptions::widget_default(),
        };

        Ok(Self { fields, options })
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            options: AutocompleteOptions::widget_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::widget_props::{BOUNDS, COMPONENT_RESTRICTIONS, TYPES};

    #[test]
    fn defaults_when_omitted() {
        let config = EffectiveConfig::resolve(&WidgetProps::new().with("placeholder", "Address"))
            .unwrap();

        assert_eq!(
            config.fields,
            vec![
                "address_components",
                "geometry.location",
                "place_id",
                "formatted_address"
            ]
        );
        assert_eq!(
            serde_json::to_value(&config.options).unwrap(),
            json!({ "componentRestrictions": { "country": "us" }, "types": ["address"] })
        );
    }

    #[test]
    fn null_counts_as_omitted() {
        let config = EffectiveConfig::resolve(
            &WidgetProps::new()
                .with(FIELDS, Value::Null)
                .with(OPTIONS, Value::Null),
        )
        .unwrap();

        assert_eq!(config, EffectiveConfig::default());
    }

    #[test]
    fn partial_options_replace_default() {
        let config =
            EffectiveConfig::resolve(&WidgetProps::new().with(OPTIONS, json!({ "radius": 500 })))
                .unwrap();

        assert_eq!(config.options.radius, Some(500.0));
        assert_eq!(config.options.component_restrictions, None);
        assert_eq!(config.options.types, None);
        assert_eq!(config.fields, default_fields());
    }

    #[test]
    fn supplied_fields_are_used_verbatim() {
        let config = EffectiveConfig::resolve(
            &WidgetProps::new().with(FIELDS, json!(["formatted_address"])),
        )
        .unwrap();

        assert_eq!(config.fields, vec!["formatted_address"]);
        assert_eq!(config.options, AutocompleteOptions::widget_default());
    }

    #[test]
    fn empty_fields_list_is_kept() {
        let config = EffectiveConfig::resolve(&WidgetProps::new().with(FIELDS, json!([]))).unwrap();

        assert!(config.fields.is_empty());
    }

    #[test]
    fn top_level_restrictions_are_ignored() {
        let config = EffectiveConfig::resolve(
            &WidgetProps::new()
                .with(TYPES, json!(["(cities)"]))
                .with(COMPONENT_RESTRICTIONS, json!({ "country": "fr" }))
                .with(BOUNDS, json!({ "north": 1.0 })),
        )
        .unwrap();

        assert_eq!(config, EffectiveConfig::default());
    }

    #[test]
    fn unknown_option_keys_are_forwarded() {
        let config = EffectiveConfig::resolve(
            &WidgetProps::new().with(OPTIONS, json!({ "strictBounds": true, "types": ["geocode"] })),
        )
        .unwrap();

        assert_eq!(config.options.types, Some(vec!["geocode".to_string()]));
        assert_eq!(config.options.extra.get("strictBounds"), Some(&json!(true)));
    }

    #[test]
    fn rejects_malformed_fields() {
        let err = EffectiveConfig::resolve(&WidgetProps::new().with(FIELDS, json!("place_id")))
            .unwrap_err();

        assert!(matches!(err, WidgetError::InvalidProperty { key: "fields", .. }));
    }

    #[test]
    fn countries_accepts_string_or_list() {
        assert_eq!(AutocompleteOptions::widget_default().countries(), vec!["us"]);

        let options: AutocompleteOptions = serde_json::from_value(json!({
            "componentRestrictions": { "country": ["us", "ca"] }
        }))
        .unwrap();
        assert_eq!(options.countries(), vec!["us", "ca"]);

        assert!(AutocompleteOptions::default().countries().is_empty());
    }
}
