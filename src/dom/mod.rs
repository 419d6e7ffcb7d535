pub mod document;
pub mod http_document;
pub mod input;
