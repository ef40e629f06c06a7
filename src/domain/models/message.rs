use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire `msg_type` values accepted by the platform's send endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Post,
    Image,
    File,
    Audio,
    Media,
    Sticker,
    Interactive,
    ShareChat,
    ShareUser,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Post => "post",
            MessageKind::Image => "image",
            MessageKind::File => "file",
            MessageKind::Audio => "audio",
            MessageKind::Media => "media",
            MessageKind::Sticker => "sticker",
            MessageKind::Interactive => "interactive",
            MessageKind::ShareChat => "share_chat",
            MessageKind::ShareUser => "share_user",
        }
    }

    /// Every kind except `text` carries a JSON object as its content.
    pub fn is_structured(&self) -> bool {
        !matches!(self, MessageKind::Text)
    }
}

/// Message as supplied by a caller, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    /// Plain text, or an already-serialized structured payload.
    Text(String),
    /// In-memory structured payload (card tree, post body, ...).
    Structured(Value),
}

impl From<&str> for MessageBody {
    fn from(value: &str) -> Self {
        MessageBody::Text(value.to_string())
    }
}

impl From<String> for MessageBody {
    fn from(value: String) -> Self {
        MessageBody::Text(value)
    }
}

impl From<Value> for MessageBody {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => MessageBody::Text(text),
            other => MessageBody::Structured(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub body: MessageBody,
}

impl Message {
    pub fn new(kind: MessageKind, body: impl Into<MessageBody>) -> Self {
        Self {
            kind,
            body: body.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Text, MessageBody::Text(text.into()))
    }

    pub fn interactive(card: impl Into<MessageBody>) -> Self {
        Self::new(MessageKind::Interactive, card)
    }
}

/// Validated wire form of a message: `content` is exactly the string the
/// send endpoint expects in its `content` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage {
    pub kind: MessageKind,
    pub content: String,
}
