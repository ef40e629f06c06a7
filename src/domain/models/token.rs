use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

/// App credentials exchanged for a tenant access token.
#[derive(Clone)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

/// Token as returned by the exchange endpoint.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub value: String,
    pub expires_in: Option<Duration>,
}

/// Cached tenant access token. `generation` increases every time the cache
/// stores a newly fetched token.
#[derive(Clone)]
pub struct AccessToken {
    pub value: String,
    pub generation: u64,
    pub expires_at: Option<Instant>,
}

impl AccessToken {
    /// True when the token expires within `margin` from now.
    pub fn expires_within(&self, margin: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => Instant::now() + margin >= expires_at,
            None => false,
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("generation", &self.generation)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
