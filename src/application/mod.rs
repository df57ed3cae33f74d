//! Application layer services implementing business logic.
//!
//! Services orchestrate domain operations by coordinating repository calls,
//! validation and business rules.
//!
//! # Available Services
//!
//! - [`services::short_url_service::ShortUrlService`] - Listing, tagging and editing short URLs
//! - [`services::short_url_resolver::ScopedShortUrlResolver`] - Scoped short code resolution
//! - [`services::auth_service::AuthService`] - API key authentication and scopes

pub mod services;
