use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    application::services::platform::PlatformApi,
    domain::{
        errors::DispatchError,
        models::{AccessToken, Credentials},
    },
};

struct FetchFailure {
    epoch: u64,
    error: DispatchError,
}

#[derive(Default)]
struct TokenState {
    token: Option<AccessToken>,
    generation: u64,
    last_failure: Option<FetchFailure>,
}

impl TokenState {
    /// The failure of a fetch that finished after `seen`, if the latest one failed.
    fn failure_since(&self, seen: u64) -> Option<DispatchError> {
        self.last_failure
            .as_ref()
            .filter(|failure| failure.epoch > seen)
            .map(|failure| replay(&failure.error))
    }
}

/// Lazily fetched tenant access token shared by every delivery.
///
/// Fetches run while the state lock is held, so callers that need a token at
/// the same time wait for the one request in flight and then share its
/// result, whether a token or an error. `refresh` compares generations to
/// tell whether the token it was handed has already been replaced.
pub struct TokenCache {
    platform: Arc<dyn PlatformApi>,
    credentials: Credentials,
    refresh_margin: Duration,
    /// Completed fetches; read before queueing on `state`.
    fetches: AtomicU64,
    state: Mutex<TokenState>,
}

impl TokenCache {
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        credentials: Credentials,
        refresh_margin: Duration,
    ) -> Self {
        Self {
            platform,
            credentials,
            refresh_margin,
            fetches: AtomicU64::new(0),
            state: Mutex::new(TokenState::default()),
        }
    }

    /// Returns the cached token, fetching one if there is none or the cached
    /// one is about to expire. A failed early renewal keeps the cached token
    /// for as long as it is still valid.
    pub async fn current(&self) -> Result<AccessToken, DispatchError> {
        let seen = self.fetches.load(Ordering::SeqCst);
        let mut state = self.state.lock().await;
        if let Some(token) = state.token.as_ref()
            && !token.expires_within(self.refresh_margin)
        {
            return Ok(token.clone());
        }

        let result = match state.failure_since(seen) {
            Some(err) => Err(err),
            None => self.fetch_into(&mut state).await,
        };
        match (result, state.token.as_ref()) {
            (Err(err), Some(token)) if !token.expires_within(Duration::ZERO) => {
                warn!(
                    generation = token.generation,
                    error = %err,
                    "token renewal failed, using current token until it expires"
                );
                Ok(token.clone())
            }
            (result, _) => result,
        }
    }

    /// Replaces `stale` after the platform rejected it. If another caller
    /// already replaced it, the newer token is returned without a request;
    /// if that caller's fetch failed, its error is returned instead.
    pub async fn refresh(&self, stale: &AccessToken) -> Result<AccessToken, DispatchError> {
        let seen = self.fetches.load(Ordering::SeqCst);
        let mut state = self.state.lock().await;
        if let Some(token) = state.token.as_ref()
            && token.generation != stale.generation
        {
            debug!(
                stale = stale.generation,
                current = token.generation,
                "token already refreshed"
            );
            return Ok(token.clone());
        }
        if let Some(err) = state.failure_since(seen) {
            debug!(stale = stale.generation, "token refresh already failed");
            return Err(err);
        }
        state.token = None;
        self.fetch_into(&mut state).await
    }

    async fn fetch_into(&self, state: &mut TokenState) -> Result<AccessToken, DispatchError> {
        let result = self.platform.fetch_token(&self.credentials).await;
        let epoch = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;

        let issued = match result {
            Ok(issued) => issued,
            Err(err) => {
                warn!(app_id = %self.credentials.app_id, error = %err, "failed to obtain tenant access token");
                state.last_failure = Some(FetchFailure {
                    epoch,
                    error: replay(&err),
                });
                return Err(err);
            }
        };

        state.last_failure = None;
        state.generation += 1;
        let token = AccessToken {
            value: issued.value,
            generation: state.generation,
            expires_at: issued.expires_in.map(|ttl| Instant::now() + ttl),
        };
        state.token = Some(token.clone());

        info!(generation = token.generation, "tenant access token issued");
        Ok(token)
    }
}

/// Copy of a token fetch error handed to callers that waited on the fetch.
fn replay(err: &DispatchError) -> DispatchError {
    match err {
        DispatchError::Auth(msg) => DispatchError::Auth(msg.clone()),
        DispatchError::Transport(msg) => DispatchError::Transport(msg.clone()),
        DispatchError::Delivery { code, msg } => DispatchError::Delivery {
            code: *code,
            msg: msg.clone(),
        },
        DispatchError::Cancelled => DispatchError::Cancelled,
        DispatchError::Payload(_) => DispatchError::Auth(err.to_string()),
    }
}
