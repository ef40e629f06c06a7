use poem_openapi::Enum;

use crate::domain::models::{MessageKind, ReceiveIdType, UserIdType};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum MessageKindDto {
    #[oai(rename = "text")]
    Text,
    #[oai(rename = "post")]
    Post,
    #[oai(rename = "image")]
    Image,
    #[oai(rename = "file")]
    File,
    #[oai(rename = "audio")]
    Audio,
    #[oai(rename = "media")]
    Media,
    #[oai(rename = "sticker")]
    Sticker,
    #[oai(rename = "interactive")]
    Interactive,
    #[oai(rename = "share_chat")]
    ShareChat,
    #[oai(rename = "share_user")]
    ShareUser,
}

impl From<MessageKindDto> for MessageKind {
    fn from(value: MessageKindDto) -> Self {
        match value {
            MessageKindDto::Text => MessageKind::Text,
            MessageKindDto::Post => MessageKind::Post,
            MessageKindDto::Image => MessageKind::Image,
            MessageKindDto::File => MessageKind::File,
            MessageKindDto::Audio => MessageKind::Audio,
            MessageKindDto::Media => MessageKind::Media,
            MessageKindDto::Sticker => MessageKind::Sticker,
            MessageKindDto::Interactive => MessageKind::Interactive,
            MessageKindDto::ShareChat => MessageKind::ShareChat,
            MessageKindDto::ShareUser => MessageKind::ShareUser,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum ReceiveIdTypeDto {
    #[default]
    #[oai(rename = "email")]
    Email,
    #[oai(rename = "open_id")]
    OpenId,
    #[oai(rename = "user_id")]
    UserId,
    #[oai(rename = "union_id")]
    UnionId,
    #[oai(rename = "chat_id")]
    ChatId,
}

impl From<ReceiveIdTypeDto> for ReceiveIdType {
    fn from(value: ReceiveIdTypeDto) -> Self {
        match value {
            ReceiveIdTypeDto::Email => ReceiveIdType::Email,
            ReceiveIdTypeDto::OpenId => ReceiveIdType::OpenId,
            ReceiveIdTypeDto::UserId => ReceiveIdType::UserId,
            ReceiveIdTypeDto::UnionId => ReceiveIdType::UnionId,
            ReceiveIdTypeDto::ChatId => ReceiveIdType::ChatId,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum UserIdTypeDto {
    #[default]
    #[oai(rename = "open_id")]
    OpenId,
    #[oai(rename = "user_id")]
    UserId,
    #[oai(rename = "union_id")]
    UnionId,
}

impl From<UserIdTypeDto> for UserIdType {
    fn from(value: UserIdTypeDto) -> Self {
        match value {
            UserIdTypeDto::OpenId => UserIdType::OpenId,
            UserIdTypeDto::UserId => UserIdType::UserId,
            UserIdTypeDto::UnionId => UserIdType::UnionId,
        }
    }
}
