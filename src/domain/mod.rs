//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`url_validator`] - Long URL validation contract
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure
//! - Traits define contracts implemented by the infrastructure layer
//! - Business logic lives in services (see [`crate::application::services`])

pub mod entities;
pub mod repositories;
pub mod url_validator;

pub use url_validator::UrlValidator;
