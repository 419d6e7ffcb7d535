use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    dom::input::InputElement,
    services::places::autocomplete::{
        AutocompleteHandle, Listener, ListenerId, ListenerRegistry, PlacesLibrary,
        PLACE_CHANGED_EVENT,
    },
    types::{autocomplete_options::AutocompleteOptions, place_result::PlaceResult},
};

#[derive(Default)]
pub struct FakePlacesLibrary {
    created: Mutex<Vec<Arc<FakeAutocomplete>>>,
}

impl FakePlacesLibrary {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn created(&self) -> Vec<Arc<FakeAutocomplete>> {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Arc<FakeAutocomplete> {
        self.created().pop().expect("no autocomplete was created")
    }
}

impl PlacesLibrary for FakePlacesLibrary {
    fn create_autocomplete(
        &self,
        element: Arc<InputElement>,
        options: &AutocompleteOptions,
    ) -> Arc<dyn AutocompleteHandle> {
        let autocomplete = Arc::new(FakeAutocomplete {
            element,
            options: options.clone(),
            fields: Mutex::new(None),
            place: Mutex::new(PlaceResult::default()),
            listeners: ListenerRegistry::new(),
        });
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(autocomplete.clone());
        autocomplete
    }
}

pub struct FakeAutocomplete {
    pub element: Arc<InputElement>,
    pub options: AutocompleteOptions,
    fields: Mutex<Option<Vec<String>>>,
    place: Mutex<PlaceResult>,
    listeners: ListenerRegistry,
}

impl FakeAutocomplete {
    pub fn fields(&self) -> Option<Vec<String>> {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count(PLACE_CHANGED_EVENT)
    }

    /// Simulate the user picking `place` from the suggestions.
    pub fn select(&self, place: PlaceResult) -> usize {
        *self.place.lock().unwrap_or_else(PoisonError::into_inner) = place;
        self.listeners.emit(PLACE_CHANGED_EVENT)
    }
}

impl AutocompleteHandle for FakeAutocomplete {
    fn set_fields(&self, fields: &[String]) {
        *self.fields.lock().unwrap_or_else(PoisonError::into_inner) = Some(fields.to_vec());
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

#[derive(Clone, Default)]
pub struct PlaceRecorder {
    places: Arc<Mutex<Vec<PlaceResult>>>,
}

impl PlaceRecorder {
    pub fn handler(&self) -> impl Fn(PlaceResult) + Send + Sync + 'static {
        let places = self.places.clone();
        move |place| places.lock().unwrap().push(place)
    }

    pub fn places(&self) -> Vec<PlaceResult> {
        self.places.lock().unwrap().clone()
    }
}
