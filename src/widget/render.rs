use std::collections::HashSet;

use serde_json::Value;
use tracing::warn;

use crate::{
    dom::input::InputRef,
    types::widget_props::{
        PropMap, WidgetProps, API_KEY, BOUNDS, COMPONENT_RESTRICTIONS, INPUT_AUTOCOMPLETE_VALUE,
        ON_PLACE_SELECTED, OPTIONS, TYPES,
    },
};

/// Widget properties that never reach the rendered element.
pub const EXCLUDED_PROPS: [&str; 7] = [
    ON_PLACE_SELECTED,
    TYPES,
    COMPONENT_RESTRICTIONS,
    BOUNDS,
    OPTIONS,
    API_KEY,
    INPUT_AUTOCOMPLETE_VALUE,
];

/// Deny list applied to a property map.
#[derive(Debug, Clone)]
pub struct PropFilter {
    excluded: HashSet<&'static str>,
}

impl PropFilter {
    pub fn new(excluded: &[&'static str]) -> Self {
        Self {
            excluded: excluded.iter().copied().collect(),
        }
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded.contains(key)
    }

    pub fn apply(&self, props: &PropMap) -> PropMap {
        props
            .iter()
            .filter(|(key, _)| !self.is_excluded(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl Default for PropFilter {
    fn default() -> Self {
        Self::new(&EXCLUDED_PROPS)
    }
}

pub fn filter_props(props: &PropMap) -> PropMap {
    PropFilter::default().apply(props)
}

/// The single `<input>` the widget renders.
#[derive(Debug, Clone)]
pub struct RenderedInput {
    pub attributes: PropMap,
    pub input_ref: InputRef,
}

pub fn render(props: &WidgetProps, input_ref: &InputRef) -> RenderedInput {
    RenderedInput {
        attributes: filter_props(props.properties()),
        input_ref: input_ref.clone(),
    }
}

impl RenderedInput {
    /// Attributes with an invalid name or an `on*` name are left out.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<input");
        for (key, value) in &self.attributes {
            if !is_attribute_name(key) || is_event_handler(key) {
                warn!("Not rendering attribute {:?}", key);
                continue;
            }
            let name = attribute_name(key);
            match value {
                Value::Null | Value::Bool(false) => {}
                Value::Bool(true) => {
                    html.push(' ');
                    html.push_str(&name);
                }
                Value::String(s) => push_attribute(&mut html, &name, s),
                other => push_attribute(&mut html, &name, &other.to_string()),
            }
        }
        html.push_str(" />");
        html
    }
}

fn push_attribute(html: &mut String, name: &str, value: &str) {
    html.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
}

fn attribute_name(key: &str) -> String {
    match key {
        "className" => "class".to_string(),
        "htmlFor" => "for".to_string(),
        "defaultValue" => "value".to_string(),
        other => other.to_ascii_lowercase(),
    }
}

/// `[A-Za-z][A-Za-z0-9_:.-]*`
pub fn is_attribute_name(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '.' | '-'))
        }
        _ => false,
    }
}

pub fn is_event_handler(key: &str) -> bool {
    key.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
