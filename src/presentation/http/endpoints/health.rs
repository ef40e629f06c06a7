use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Json};

use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags},
    responses::HealthDto,
};

#[derive(Clone)]
pub struct HealthEndpoints {
    state: Arc<ApiState>,
}

impl HealthEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl HealthEndpoints {
    #[oai(path = "/health", method = "get", tag = EndpointsTags::Health)]
    pub async fn health(&self) -> Json<HealthDto> {
        Json(HealthDto {
            status: if self.state.shutdown.is_cancelled() {
                "shutting_down".to_string()
            } else {
                "ok".to_string()
            },
            admission_capacity: self.state.gate.capacity() as u32,
            admission_available: self.state.gate.available() as u32,
        })
    }
}
