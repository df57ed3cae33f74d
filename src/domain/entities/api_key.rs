//! API keys and the access scope they grant.

use chrono::{DateTime, Utc};

use super::ShortUrl;

/// An API key as stored. Only the HMAC of the raw key is kept.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub id: i64,
    pub name: String,
    pub key_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
    /// Restricted keys only see the short URLs they authored.
    pub restricted: bool,
}

impl ApiKey {
    /// Returns true if the key is neither revoked nor expired.
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none() && !self.expires_at.is_some_and(|e| Utc::now() >= e)
    }

    pub fn access_scope(&self) -> AccessScope {
        if self.restricted {
            AccessScope::ScopedToOwner(self.id)
        } else {
            AccessScope::Unrestricted
        }
    }
}

/// Visibility boundary applied to every short URL lookup, listing and mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessScope {
    /// Sees every short URL. Used for admin keys and for callers without a key.
    #[default]
    Unrestricted,
    /// Sees only short URLs authored by the given API key id.
    ScopedToOwner(i64),
}

impl AccessScope {
    /// Returns true if the short URL is visible under this scope.
    pub fn allows(&self, short_url: &ShortUrl) -> bool {
        match self {
            AccessScope::Unrestricted => true,
            AccessScope::ScopedToOwner(owner_id) => {
                short_url.author_api_key_id() == Some(*owner_id)
            }
        }
    }

    /// Owner id to filter on, if any.
    pub fn owner_id(&self) -> Option<i64> {
        match self {
            AccessScope::Unrestricted => None,
            AccessScope::ScopedToOwner(owner_id) => Some(*owner_id),
        }
    }
}

impl From<Option<&ApiKey>> for AccessScope {
    fn from(api_key: Option<&ApiKey>) -> Self {
        api_key.map_or(AccessScope::Unrestricted, ApiKey::access_scope)
    }
}
