pub mod app_state;
pub mod autocomplete_options;
pub mod place_result;
pub mod widget_props;
