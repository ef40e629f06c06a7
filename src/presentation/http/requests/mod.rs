use poem_openapi::Object;
use serde_json::Value;

use crate::presentation::models::{MessageKindDto, ReceiveIdTypeDto, UserIdTypeDto};

#[derive(Object, Debug)]
pub struct SendMessageRequestDto {
    #[oai(validator(min_length = 1))]
    pub recipient: String,
    #[oai(default)]
    pub receive_id_type: ReceiveIdTypeDto,
    pub msg_type: MessageKindDto,
    /// Text, a serialized JSON payload, or an inline JSON payload.
    pub content: Value,
}

#[derive(Object, Debug)]
pub struct BatchSendRequestDto {
    pub recipients: Vec<String>,
    #[oai(default)]
    pub receive_id_type: ReceiveIdTypeDto,
    pub msg_type: MessageKindDto,
    pub content: Value,
}

#[derive(Object, Debug)]
pub struct ResolveRecipientsRequestDto {
    pub emails: Vec<String>,
    #[oai(default)]
    pub user_id_type: UserIdTypeDto,
}
