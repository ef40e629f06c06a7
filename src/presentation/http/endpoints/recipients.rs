use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, payload::Json};

use crate::{
    application::usecases::resolve_recipients::ResolveRecipientsRequest,
    domain::errors::DispatchError,
    presentation::http::{
        endpoints::root::{ApiState, EndpointsTags},
        security::ApiAccess,
        mappers::map_resolved,
        requests::ResolveRecipientsRequestDto,
        responses::ResolveRecipientsResponseDto,
    },
};

#[derive(Clone)]
pub struct RecipientsEndpoints {
    state: Arc<ApiState>,
}

impl RecipientsEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl RecipientsEndpoints {
    #[oai(
        path = "/recipients/resolve",
        method = "post",
        tag = EndpointsTags::Recipients,
    )]
    pub async fn resolve(
        &self,
        auth: ApiAccess,
        request: Json<ResolveRecipientsRequestDto>,
    ) -> PoemResult<Json<ResolveRecipientsResponseDto>> {
        auth.authorize(&self.state.api_key)?;
        let request = request.0;

        let recipients = self
            .state
            .resolve_recipients_usecase
            .execute(ResolveRecipientsRequest {
                emails: request.emails,
                user_id_type: request.user_id_type.into(),
            })
            .await
            .map_err(upstream_error)?;

        Ok(Json(ResolveRecipientsResponseDto {
            recipients: recipients.iter().map(map_resolved).collect(),
        }))
    }
}

fn upstream_error(err: DispatchError) -> poem::Error {
    let status = match err {
        DispatchError::Payload(_) => poem::http::StatusCode::BAD_REQUEST,
        DispatchError::Cancelled => poem::http::StatusCode::SERVICE_UNAVAILABLE,
        _ => poem::http::StatusCode::BAD_GATEWAY,
    };
    poem::Error::from_string(err.to_string(), status)
}
