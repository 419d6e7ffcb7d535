pub mod autocomplete;
pub mod http_autocomplete;
pub mod places_service;
pub mod types;
