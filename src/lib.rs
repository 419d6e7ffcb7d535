pub mod app;
pub mod dom;
pub mod routes;
pub mod services;
pub mod types;
pub mod utils;
pub mod widget;

#[cfg(test)]
pub(crate) mod test_support;

pub use types::{
    autocomplete_options::{AutocompleteOptions, EffectiveConfig},
    place_result::PlaceResult,
    widget_props::{PropMap, WidgetProps},
};
pub use widget::component::{EffectHandle, PlacesWidget, TeardownPolicy, WidgetSettings};
