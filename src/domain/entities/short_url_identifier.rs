//! Identifier used to look up a single short URL.

use std::fmt;

/// Short code plus the optional domain it was minted for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortUrlIdentifier {
    short_code: String,
    domain: Option<String>,
}

impl ShortUrlIdentifier {
    pub fn new(short_code: impl Into<String>, domain: Option<String>) -> Self {
        Self {
            short_code: short_code.into(),
            domain,
        }
    }

    /// Identifier for a short URL on the default domain.
    pub fn from_short_code(short_code: impl Into<String>) -> Self {
        Self::new(short_code, None)
    }

    pub fn short_code(&self) -> &str {
        &self.short_code
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
}

impl fmt::Display for ShortUrlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.domain {
            Some(domain) => write!(f, "{}/{}", domain, self.short_code),
            None => f.write_str(&self.short_code),
        }
    }
}
