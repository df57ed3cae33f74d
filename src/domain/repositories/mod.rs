//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access and are implemented by the PostgreSQL
//! repositories in `crate::infrastructure::persistence`. Mock implementations
//! are generated with `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`ShortUrlRepository`] - Scoped lookups, listings and commits of short URLs
//! - [`TagRepository`] - Tag lookup by name
//! - [`ApiKeyRepository`] - API key storage and authentication lookups
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod api_key_repository;
pub mod short_url_repository;
pub mod tag_repository;

pub use api_key_repository::ApiKeyRepository;
pub use short_url_repository::ShortUrlRepository;
pub use tag_repository::TagRepository;

#[cfg(test)]
pub use api_key_repository::MockApiKeyRepository;
#[cfg(test)]
pub use short_url_repository::MockShortUrlRepository;
#[cfg(test)]
pub use tag_repository::MockTagRepository;
