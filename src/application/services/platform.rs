use async_trait::async_trait;

use crate::domain::{
    errors::DispatchError,
    models::{Credentials, EncodedMessage, IssuedToken, Recipient, UserIdType},
};

/// Platform code for a successful call.
pub const CODE_OK: i64 = 0;
/// Platform code for an invalid or expired tenant access token.
pub const CODE_TOKEN_INVALID: i64 = 99991663;

/// How the platform answered a send or lookup call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiStatus {
    Ok,
    TokenInvalid,
    Rejected { code: i64, msg: String },
}

impl ApiStatus {
    pub fn from_code(code: i64, msg: impl Into<String>) -> Self {
        match code {
            CODE_OK => ApiStatus::Ok,
            CODE_TOKEN_INVALID => ApiStatus::TokenInvalid,
            code => ApiStatus::Rejected {
                code,
                msg: msg.into(),
            },
        }
    }
}

/// One send request: recipient, encoded content and the de-duplication nonce.
#[derive(Debug, Clone)]
pub struct OutboundMessage<'a> {
    pub recipient: &'a Recipient,
    pub message: &'a EncodedMessage,
    pub nonce: &'a str,
}

/// Entry of the email lookup response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLookup {
    pub email: String,
    pub user_id: Option<String>,
    pub is_activated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStatus {
    Found(Vec<UserLookup>),
    TokenInvalid,
    Rejected { code: i64, msg: String },
}

/// Outbound boundary of the engine. Implementations perform exactly one
/// network call per method and never retry.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<IssuedToken, DispatchError>;

    async fn send_message(
        &self,
        token: &str,
        request: OutboundMessage<'_>,
    ) -> Result<ApiStatus, DispatchError>;

    async fn lookup_users(
        &self,
        token: &str,
        emails: &[String],
        user_id_type: UserIdType,
    ) -> Result<LookupStatus, DispatchError>;
}
