//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` structs.
//!
//! # Repositories
//!
//! - [`PgShortUrlRepository`] - Short URL lookup, filtered listing and persistence
//! - [`PgTagRepository`] - Tag lookup by name
//! - [`PgApiKeyRepository`] - API key storage and validation

pub mod pg_api_key_repository;
pub mod pg_short_url_repository;
pub mod pg_tag_repository;

pub use pg_api_key_repository::PgApiKeyRepository;
pub use pg_short_url_repository::PgShortUrlRepository;
pub use pg_tag_repository::PgTagRepository;
