use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, PoisonError,
};

use crate::{
    dom::input::InputElement,
    types::{autocomplete_options::AutocompleteOptions, place_result::PlaceResult},
};

pub const PLACE_CHANGED_EVENT: &str = "place_changed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Arc<dyn Fn() + Send + Sync>;

pub trait AutocompleteHandle: Send + Sync {
    fn set_fields(&self, fields: &[String]);

    fn add_listener(&self, event: &str, listener: Listener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);

    fn get_place(&self) -> PlaceResult;
}

pub trait PlacesLibrary: Send + Sync {
    fn create_autocomplete(
        &self,
        element: Arc<InputElement>,
        options: &AutocompleteOptions,
    ) -> Arc<dyn AutocompleteHandle>;
}

#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, String, Listener)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, event: &str, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, event.to_string(), listener));
        id
    }

    pub fn remove(&self, id: ListenerId) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(listener_id, _, _)| *listener_id != id);
    }

    pub fn count(&self, event: &str) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, e, _)| e == event)
            .count()
    }

    /// Call every listener of `event` in subscription order. Listeners run
    /// without the registry locked, so they may call back into the handle.
    pub fn emit(&self, event: &str) -> usize {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, e, _)| e == event)
            .map(|(_, _, l)| l.clone())
            .collect();

        for listener in &listeners {
            listener();
        }
        listeners.len()
    }
}
