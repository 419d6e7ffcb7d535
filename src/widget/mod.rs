pub mod binder;
pub mod component;
pub mod relay;
pub mod render;
