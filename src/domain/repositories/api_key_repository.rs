//! Repository trait for API keys.

use crate::domain::entities::ApiKey;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for API key management.
///
/// Keys are stored as HMAC-SHA256 hashes; raw keys never reach the database.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgApiKeyRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_api_key.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Finds an active (not revoked, not expired) key by its hash.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_active_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, AppError>;

    /// Updates the `last_used_at` timestamp for a key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_last_used(&self, id: i64) -> Result<(), AppError>;

    /// Creates a new API key.
    ///
    /// # Arguments
    ///
    /// - `name` - Human-readable key name
    /// - `key_hash` - HMAC-SHA256 of the raw key
    /// - `restricted` - Whether the key only sees the short URLs it authored
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name or hash is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, name: &str, key_hash: &str, restricted: bool)
    -> Result<ApiKey, AppError>;

    /// Lists all keys, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<ApiKey>, AppError>;

    /// Finds a key by its database ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<ApiKey>, AppError>;

    /// Finds a key by its name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_name(&self, name: &str) -> Result<Option<ApiKey>, AppError>;

    /// Revokes a key, preventing further authentication.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn revoke(&self, id: i64) -> Result<(), AppError>;
}
