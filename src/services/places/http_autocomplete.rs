use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::{debug, error};

use super::{
    autocomplete::{
        AutocompleteHandle, Listener, ListenerId, ListenerRegistry, PlacesLibrary,
        PLACE_CHANGED_EVENT,
    },
    places_service::{AutocompleteSearchInput, AutocompleteSearchOutputPrediction, PlacesService},
    types::places_service_error::PlacesServiceError,
};
use crate::{
    dom::input::InputElement,
    types::{autocomplete_options::AutocompleteOptions, place_result::PlaceResult},
};

pub struct HttpPlacesLibrary {
    service: PlacesService,
    created: Mutex<Vec<Weak<HttpAutocomplete>>>,
}

impl HttpPlacesLibrary {
    pub fn new(service: PlacesService) -> Self {
        Self {
            service,
            created: Mutex::new(Vec::new()),
        }
    }

    /// The newest live autocomplete attached to `element`.
    pub fn autocomplete_for(&self, element: &Arc<InputElement>) -> Option<Arc<HttpAutocomplete>> {
        let mut created = self.created.lock().unwrap_or_else(PoisonError::into_inner);
        created.retain(|a| a.strong_count() > 0);
        created
            .iter()
            .rev()
            .filter_map(Weak::upgrade)
            .find(|a| Arc::ptr_eq(&a.element, element))
    }
}

impl PlacesLibrary for HttpPlacesLibrary {
    fn create_autocomplete(
        &self,
        element: Arc<InputElement>,
        options: &AutocompleteOptions,
    ) -> Arc<dyn AutocompleteHandle> {
        let autocomplete = Arc::new(HttpAutocomplete {
            service: self.service.clone(),
            element,
            options: options.clone(),
            fields: Mutex::new(Vec::new()),
            place: Mutex::new(PlaceResult::default()),
            listeners: ListenerRegistry::new(),
        });

        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(&autocomplete));

        autocomplete
    }
}

pub struct HttpAutocomplete {
    service: PlacesService,
    element: Arc<InputElement>,
    options: AutocompleteOptions,
    fields: Mutex<Vec<String>>,
    place: Mutex<PlaceResult>,
    listeners: ListenerRegistry,
}

impl HttpAutocomplete {
    pub fn options(&self) -> &AutocompleteOptions {
        &self.options
    }

    pub fn fields(&self) -> Vec<String> {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn predict(
        &self,
    ) -> Result<Vec<AutocompleteSearchOutputPrediction>, PlacesServiceError> {
        let input = self.element.value().unwrap_or_default();
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let output = self
            .service
            .get_autocomplete(AutocompleteSearchInput {
                input,
                options: self.options.clone(),
            })
            .await?;

        Ok(output.predictions)
    }

    /// Returns whether a place was selected. Lookup failures are logged and
    /// leave the previous place in place.
    pub async fn select(&self, place_id: &str) -> bool {
        let fields = self.fields();
        let place = match self.service.get_place_details(place_id, &fields).await {
            Ok(place) => place,
            Err(e) => {
                error!("Failed to fetch place details: {}", e);
                return false;
            }
        };

        *self.place.lock().unwrap_or_else(PoisonError::into_inner) = place;

        let notified = self.listeners.emit(PLACE_CHANGED_EVENT);
        debug!("Place selected, notified {} listener(s)", notified);
        true
    }
}

impl AutocompleteHandle for HttpAutocomplete {
    fn set_fields(&self, fields: &[String]) {
        *self.fields.lock().unwrap_or_else(PoisonError::into_inner) = fields.to_vec();
    }

    fn add_listener(&self, event: &str, listener: Listener) -> ListenerId {
        self.listeners.add(event, listener)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.remove(id)
    }

    fn get_place(&self) -> PlaceResult {
        self.place
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
