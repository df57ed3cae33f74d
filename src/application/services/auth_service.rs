//! API key authentication and access scope resolution.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{AccessScope, ApiKey};
use crate::domain::repositories::ApiKeyRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw API key with HMAC-SHA256 keyed by the signing secret.
///
/// Returns a 64-character lowercase hex-encoded MAC. Used both when storing a
/// new key and when authenticating one.
pub fn hash_api_key(signing_secret: &str, raw_key: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(raw_key.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Service turning raw API keys into [`ApiKey`] records and access scopes.
///
/// An attacker with read-only access to the database cannot verify or forge
/// keys without the server-side secret.
pub struct AuthService<R: ApiKeyRepository> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: ApiKeyRepository> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - API key repository
    /// - `signing_secret` - HMAC key; must match the value used when keys were created
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    fn hash_key(&self, raw_key: &str) -> String {
        hash_api_key(&self.signing_secret, raw_key)
    }

    /// Authenticates a raw API key.
    ///
    /// On success, updates `last_used_at` on a best-effort basis.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the key is unknown, revoked or expired.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, raw_key: &str) -> Result<ApiKey, AppError> {
        let key_hash = self.hash_key(raw_key);

        let api_key = self
            .repository
            .find_active_by_hash(&key_hash)
            .await?
            .filter(ApiKey::is_active)
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Invalid, expired or revoked API key" }),
                )
            })?;

        if let Err(e) = self.repository.update_last_used(api_key.id).await {
            tracing::warn!(error = ?e, api_key_id = api_key.id, "Failed to update API key usage");
        }

        Ok(api_key)
    }

    /// Resolves the access scope for an optional raw API key.
    ///
    /// No key means [`AccessScope::Unrestricted`].
    ///
    /// # Errors
    ///
    /// See [`Self::authenticate`].
    pub async fn resolve_scope(&self, raw_key: Option<&str>) -> Result<AccessScope, AppError> {
        match raw_key {
            None => Ok(AccessScope::Unrestricted),
            Some(raw_key) => {
                let api_key = self.authenticate(raw_key).await?;
                Ok(AccessScope::from(Some(&api_key)))
            }
        }
    }
}
