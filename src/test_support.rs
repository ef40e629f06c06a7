//! In-process platform double shared by the unit tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{
    application::services::platform::{
        ApiStatus, LookupStatus, OutboundMessage, PlatformApi, UserLookup,
    },
    domain::{
        errors::DispatchError,
        models::{Credentials, IssuedToken, UserIdType},
    },
};

#[derive(Debug, Clone)]
pub struct SentRequest {
    pub recipient: String,
    pub token: String,
    pub nonce: String,
    pub content: String,
    pub at: Instant,
}

#[derive(Default)]
struct State {
    scripts: HashMap<String, VecDeque<Result<ApiStatus, String>>>,
    always: HashMap<String, ApiStatus>,
    expired_tokens: HashSet<String>,
    directory: HashMap<String, (String, bool)>,
    sent: Vec<SentRequest>,
    lookups: Vec<Vec<String>>,
}

#[derive(Default)]
pub struct FakePlatform {
    token_requests: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    /// Token requests beyond this count fail.
    fail_auth_after: Option<usize>,
    auth_latency: Option<Duration>,
    token_ttl: Option<Duration>,
    latency: Option<Duration>,
    state: Mutex<State>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_auth(self) -> Self {
        self.failing_auth_after(0)
    }

    pub fn failing_auth_after(mut self, successes: usize) -> Self {
        self.fail_auth_after = Some(successes);
        self
    }

    pub fn with_auth_latency(mut self, latency: Duration) -> Self {
        self.auth_latency = Some(latency);
        self
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = Some(ttl);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queues responses for `recipient`; once drained, sends succeed.
    pub fn script(self, recipient: &str, responses: Vec<Result<ApiStatus, String>>) -> Self {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(recipient.to_string(), responses.into());
        self
    }

    pub fn always(self, recipient: &str, status: ApiStatus) -> Self {
        self.state
            .lock()
            .unwrap()
            .always
            .insert(recipient.to_string(), status);
        self
    }

    /// Every send presenting `token` is answered with the expiry code.
    pub fn expire_token(self, token: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .expired_tokens
            .insert(token.to_string());
        self
    }

    pub fn with_user(self, email: &str, user_id: &str, activated: bool) -> Self {
        self.state
            .lock()
            .unwrap()
            .directory
            .insert(email.to_string(), (user_id.to_string(), activated));
        self
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<SentRequest> {
        self.sent()
            .into_iter()
            .filter(|r| r.recipient == recipient)
            .collect()
    }

    pub fn lookups(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().lookups.clone()
    }
}

#[async_trait]
impl PlatformApi for FakePlatform {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<IssuedToken, DispatchError> {
        let n = self.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(latency) = self.auth_latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_auth_after.is_some_and(|successes| n > successes) {
            return Err(DispatchError::Auth(format!(
                "code 10014: app secret invalid for {}",
                credentials.app_id
            )));
        }
        Ok(IssuedToken {
            value: format!("t-{n}"),
            expires_in: self.token_ttl,
        })
    }

    async fn send_message(
        &self,
        token: &str,
        request: OutboundMessage<'_>,
    ) -> Result<ApiStatus, DispatchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let recipient = request.recipient.id.clone();
        let mut state = self.state.lock().unwrap();
        state.sent.push(SentRequest {
            recipient: recipient.clone(),
            token: token.to_string(),
            nonce: request.nonce.to_string(),
            content: request.message.content.clone(),
            at: Instant::now(),
        });

        if state.expired_tokens.contains(token) {
            return Ok(ApiStatus::TokenInvalid);
        }
        if let Some(status) = state.always.get(&recipient) {
            return Ok(status.clone());
        }
        match state.scripts.get_mut(&recipient).and_then(|q| q.pop_front()) {
            Some(Ok(status)) => Ok(status),
            Some(Err(reason)) => Err(DispatchError::Transport(reason)),
            None => Ok(ApiStatus::Ok),
        }
    }

    async fn lookup_users(
        &self,
        token: &str,
        emails: &[String],
        _user_id_type: UserIdType,
    ) -> Result<LookupStatus, DispatchError> {
        let mut state = self.state.lock().unwrap();
        state.lookups.push(emails.to_vec());
        if state.expired_tokens.contains(token) {
            return Ok(LookupStatus::TokenInvalid);
        }
        let users = emails
            .iter()
            .filter_map(|email| {
                state.directory.get(email).map(|(id, activated)| UserLookup {
                    email: email.clone(),
                    user_id: Some(id.clone()),
                    is_activated: *activated,
                })
            })
            .collect();
        Ok(LookupStatus::Found(users))
    }
}
