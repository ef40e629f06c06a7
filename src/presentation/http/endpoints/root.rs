use std::sync::Arc;

use poem::{Endpoint, EndpointExt, Route};
use poem_openapi::{OpenApiService, Tags};
use tokio_util::sync::CancellationToken;

use crate::{
    application::{
        services::rate_limiter::AdmissionGate,
        usecases::{
            resolve_recipients::ResolveRecipientsUseCase, send_batch::SendBatchUseCase,
            send_message::SendMessageUseCase,
        },
    },
    presentation::http::{
        endpoints::{
            health::HealthEndpoints, messages::MessagesEndpoints, recipients::RecipientsEndpoints,
        },
        security::ApiKey,
    },
};

pub struct ApiState {
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub send_batch_usecase: Arc<SendBatchUseCase>,
    pub resolve_recipients_usecase: Arc<ResolveRecipientsUseCase>,
    pub gate: AdmissionGate,
    pub api_key: ApiKey,
    /// Cancelled on shutdown; in-flight deliveries stop and report failure.
    pub shutdown: CancellationToken,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Messages,
    Recipients,
}

pub fn api(state: Arc<ApiState>) -> (HealthEndpoints, MessagesEndpoints, RecipientsEndpoints) {
    (
        HealthEndpoints::new(state.clone()),
        MessagesEndpoints::new(state.clone()),
        RecipientsEndpoints::new(state),
    )
}

/// OpenAPI service under `/api` and Swagger UI at the root.
pub fn app(state: Arc<ApiState>, server_url: String) -> impl Endpoint {
    let api_key = state.api_key.clone();
    let api_service = OpenApiService::new(api(state), "Feishu Dispatch API", "0.1.0")
        .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();
    Route::new()
        .nest("/api", api_service)
        .nest("/", ui)
        .data(api_key)
}
