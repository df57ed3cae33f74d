//! Long URL validation implementations.

pub mod http_url_validator;

pub use http_url_validator::HttpUrlValidator;
