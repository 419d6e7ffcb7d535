pub mod app_error;
pub mod validated_query;
pub mod widget_error;
