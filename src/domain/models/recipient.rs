use serde::{Deserialize, Serialize};

/// Identifier space of a recipient, sent as `receive_id_type`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReceiveIdType {
    #[default]
    Email,
    OpenId,
    UserId,
    UnionId,
    ChatId,
}

impl ReceiveIdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiveIdType::Email => "email",
            ReceiveIdType::OpenId => "open_id",
            ReceiveIdType::UserId => "user_id",
            ReceiveIdType::UnionId => "union_id",
            ReceiveIdType::ChatId => "chat_id",
        }
    }
}

/// Identifier space of the ids returned by the email lookup endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserIdType {
    #[default]
    OpenId,
    UserId,
    UnionId,
}

impl UserIdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserIdType::OpenId => "open_id",
            UserIdType::UserId => "user_id",
            UserIdType::UnionId => "union_id",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: String,
    pub id_type: ReceiveIdType,
}

impl Recipient {
    pub fn new(id: impl Into<String>, id_type: ReceiveIdType) -> Self {
        Self {
            id: id.into(),
            id_type,
        }
    }

    pub fn email(email: impl Into<String>) -> Self {
        Self::new(email, ReceiveIdType::Email)
    }
}

/// Result of looking up one email. `user_id` is `None` when the platform
/// does not know the email or the user is not activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRecipient {
    pub email: String,
    pub user_id: Option<String>,
}
