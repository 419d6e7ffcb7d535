use std::sync::{Arc, Weak};

use tracing::debug;

use crate::{
    dom::input::InputRef,
    services::places::autocomplete::{AutocompleteHandle, Listener},
    types::widget_props::PlaceSelectedHandler,
};

/// Forwards a completed selection to the caller and into the input.
///
/// Holds the autocomplete weakly: the autocomplete owns this relay through
/// its listener list.
pub struct SelectionRelay {
    handle: Weak<dyn AutocompleteHandle>,
    on_place_selected: Option<PlaceSelectedHandler>,
    input_ref: InputRef,
}

impl SelectionRelay {
    pub fn new(
        handle: &Arc<dyn AutocompleteHandle>,
        on_place_selected: Option<PlaceSelectedHandler>,
        input_ref: InputRef,
    ) -> Self {
        Self {
            handle: Arc::downgrade(handle),
            on_place_selected,
            input_ref,
        }
    }

    /// A panicking callback is not caught and the input is left untouched.
    pub fn relay(&self) {
        let Some(handle) = self.handle.upgrade() else {
            debug!("Autocomplete dropped before its selection was relayed");
            return;
        };

        let place = handle.get_place();

        if let Some(on_place_selected) = &self.on_place_selected {
            on_place_selected(place.clone());
        }

        if let Some(element) = self.input_ref.current() {
            element.set_value(place.formatted_address);
        }
    }

    pub fn into_listener(self) -> Listener {
        Arc::new(move || self.relay())
    }
}
