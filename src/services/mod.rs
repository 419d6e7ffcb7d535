pub mod places;
pub mod script_loader;
