use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, payload::Json};

use crate::{
    application::usecases::{send_batch::SendBatchRequest, send_message::SendMessageRequest},
    domain::errors::PayloadError,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        security::ApiAccess,
        mappers::{map_message, map_outcome, map_report},
        requests::{BatchSendRequestDto, SendMessageRequestDto},
        responses::{BatchSendResponseDto, DeliveryResultDto},
    },
};

pub const MAX_BATCH_RECIPIENTS: usize = 10_000;

#[derive(Clone)]
pub struct MessagesEndpoints {
    state: Arc<ApiState>,
}

impl MessagesEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl MessagesEndpoints {
    #[oai(path = "/messages", method = "post", tag = EndpointsTags::Messages)]
    pub async fn send_message(
        &self,
        auth: ApiAccess,
        request: Json<SendMessageRequestDto>,
    ) -> PoemResult<Json<DeliveryResultDto>> {
        auth.authorize(&self.state.api_key)?;
        let request = request.0;

        let outcome = self
            .state
            .send_message_usecase
            .execute(
                SendMessageRequest {
                    recipient: request.recipient,
                    receive_id_type: request.receive_id_type.into(),
                    message: map_message(request.msg_type.into(), request.content),
                },
                &self.state.shutdown,
            )
            .await
            .map_err(bad_payload)?;

        Ok(Json(map_outcome(&outcome)))
    }

    #[oai(path = "/messages/batch", method = "post", tag = EndpointsTags::Messages)]
    pub async fn batch_send(
        &self,
        auth: ApiAccess,
        request: Json<BatchSendRequestDto>,
    ) -> PoemResult<Json<BatchSendResponseDto>> {
        auth.authorize(&self.state.api_key)?;
        let request = request.0;

        if request.recipients.is_empty() {
            return Err(poem::Error::from_string(
                "recipients array cannot be empty",
                poem::http::StatusCode::BAD_REQUEST,
            ));
        }

        if request.recipients.len() > MAX_BATCH_RECIPIENTS {
            return Err(poem::Error::from_string(
                format!("recipients array cannot exceed {MAX_BATCH_RECIPIENTS} items"),
                poem::http::StatusCode::BAD_REQUEST,
            ));
        }

        let report = self
            .state
            .send_batch_usecase
            .execute(
                SendBatchRequest {
                    recipients: request.recipients,
                    receive_id_type: request.receive_id_type.into(),
                    message: map_message(request.msg_type.into(), request.content),
                },
                &self.state.shutdown,
            )
            .await
            .map_err(bad_payload)?;

        Ok(Json(map_report(&report)))
    }
}

fn bad_payload(err: PayloadError) -> poem::Error {
    poem::Error::from_string(err.to_string(), poem::http::StatusCode::BAD_REQUEST)
}
