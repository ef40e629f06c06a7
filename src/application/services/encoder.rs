use serde_json::{Value, json};

use crate::domain::{
    errors::PayloadError,
    models::{EncodedMessage, Message, MessageBody},
};

/// Upper bound for the serialized `content` field.
pub const MAX_CONTENT_BYTES: usize = 150 * 1024;

/// Builds the `content` string the send endpoint expects for `message`.
///
/// Text is wrapped as `{"text": ...}`. Every other kind must be a JSON object
/// or array, given either in memory or as a serialized string; it is
/// serialized exactly once, so equal payloads always produce identical bytes.
pub fn encode(message: &Message) -> Result<EncodedMessage, PayloadError> {
    let content = if message.kind.is_structured() {
        encode_structured(&message.body)?
    } else {
        encode_text(&message.body)?
    };

    if content.len() > MAX_CONTENT_BYTES {
        return Err(PayloadError::TooLarge {
            size: content.len(),
            limit: MAX_CONTENT_BYTES,
        });
    }

    Ok(EncodedMessage {
        kind: message.kind,
        content,
    })
}

fn encode_text(body: &MessageBody) -> Result<String, PayloadError> {
    let text = match body {
        MessageBody::Text(text) => text.as_str(),
        MessageBody::Structured(Value::String(text)) => text.as_str(),
        MessageBody::Structured(_) => return Err(PayloadError::TextBodyRequired),
    };
    if text.is_empty() {
        return Err(PayloadError::Empty);
    }
    Ok(json!({ "text": text }).to_string())
}

fn encode_structured(body: &MessageBody) -> Result<String, PayloadError> {
    let value = match body {
        MessageBody::Text(raw) => {
            if raw.trim().is_empty() {
                return Err(PayloadError::Empty);
            }
            serde_json::from_str::<Value>(raw).map_err(PayloadError::Malformed)?
        }
        MessageBody::Structured(value) => value.clone(),
    };

    match value {
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string(&value).map_err(PayloadError::Malformed)
        }
        Value::String(_) => Err(PayloadError::DoubleEncoded),
        _ => Err(PayloadError::NotStructured),
    }
}
