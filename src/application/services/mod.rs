//! Business logic services for the application layer.

pub mod auth_service;
pub mod short_url_resolver;
pub mod short_url_service;

pub use auth_service::{AuthService, hash_api_key};
pub use short_url_resolver::{ScopedShortUrlResolver, ShortUrlResolver};
pub use short_url_service::ShortUrlService;
