use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde_json::Value;

use crate::types::widget_props::PropMap;

/// `value` is `None` after a selection without a formatted address.
#[derive(Debug, Default)]
pub struct InputElement {
    attributes: RwLock<PropMap>,
    value: Mutex<Option<String>>,
}

impl InputElement {
    pub fn new(attributes: PropMap) -> Self {
        let value = initial_value(&attributes);

        Self {
            attributes: RwLock::new(attributes),
            value: Mutex::new(value),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn attributes(&self) -> PropMap {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-render in place: attributes change, the typed value does not.
    pub fn set_attributes(&self, attributes: PropMap) {
        *self.attributes.write().unwrap_or_else(PoisonError::into_inner) = attributes;
    }

    pub fn value(&self) -> Option<String> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_value(&self, value: Option<String>) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

fn initial_value(attributes: &PropMap) -> Option<String> {
    ["value", "defaultValue"]
        .iter()
        .find_map(|key| attributes.get(*key))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Empty before mount and after unmount. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct InputRef {
    current: Arc<RwLock<Option<Arc<InputElement>>>>,
}

impl InputRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<InputElement>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_live(&self) -> bool {
        self.current().is_some()
    }

    pub fn attach(&self, element: Arc<InputElement>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(element);
    }

    pub fn detach(&self) -> Option<Arc<InputElement>> {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
