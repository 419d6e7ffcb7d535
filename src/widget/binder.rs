use std::sync::Arc;

use tracing::{debug, error};

use super::relay::SelectionRelay;
use crate::{
    dom::input::{InputElement, InputRef},
    services::places::autocomplete::{
        AutocompleteHandle, ListenerId, PlacesLibrary, PLACE_CHANGED_EVENT,
    },
    types::{autocomplete_options::EffectiveConfig, widget_props::PlaceSelectedHandler},
};

pub struct Binding {
    handle: Arc<dyn AutocompleteHandle>,
    listener: ListenerId,
    element: Arc<InputElement>,
}

impl Binding {
    pub fn handle(&self) -> &Arc<dyn AutocompleteHandle> {
        &self.handle
    }

    pub fn element(&self) -> &Arc<InputElement> {
        &self.element
    }

    pub fn release(&self) {
        self.handle.remove_listener(self.listener);
    }
}

#[derive(Clone)]
pub struct AutocompleteBinder {
    places: Arc<dyn PlacesLibrary>,
}

impl AutocompleteBinder {
    pub fn new(places: Arc<dyn PlacesLibrary>) -> Self {
        Self { places }
    }

    /// Always creates a fresh autocomplete. Returns `None`, after logging,
    /// when the input is not attached.
    pub fn bind(
        &self,
        input_ref: &InputRef,
        config: &EffectiveConfig,
        on_place_selected: Option<PlaceSelectedHandler>,
    ) -> Option<Binding> {
        let Some(element) = input_ref.current() else {
            error!("No address input field");
            return None;
        };

        let handle = self
            .places
            .create_autocomplete(element.clone(), &config.options);
        handle.set_fields(&config.fields);

        let relay = SelectionRelay::new(&handle, on_place_selected, input_ref.clone());
        let listener = handle.add_listener(PLACE_CHANGED_EVENT, relay.into_listener());

        debug!("Bound autocomplete with fields {:?}", config.fields);

        Some(Binding {
            handle,
            listener,
            element,
        })
    }
}
