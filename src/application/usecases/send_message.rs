use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    application::{handlers::message_dispatcher::MessageDispatchHandler, services::encoder::encode},
    domain::{
        errors::PayloadError,
        models::{DeliveryOutcome, Message, ReceiveIdType, Recipient},
    },
};

pub struct SendMessageUseCase {
    dispatcher: Arc<MessageDispatchHandler>,
}

pub struct SendMessageRequest {
    pub recipient: String,
    pub receive_id_type: ReceiveIdType,
    pub message: Message,
}

impl SendMessageUseCase {
    pub fn new(dispatcher: Arc<MessageDispatchHandler>) -> Self {
        Self { dispatcher }
    }

    pub async fn execute(
        &self,
        request: SendMessageRequest,
        cancel: &CancellationToken,
    ) -> Result<DeliveryOutcome, PayloadError> {
        let encoded = encode(&request.message)?;
        let recipient = Recipient::new(request.recipient, request.receive_id_type);
        Ok(self.dispatcher.deliver(&recipient, &encoded, cancel).await)
    }
}
