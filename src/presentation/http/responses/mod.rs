use poem_openapi::Object;

#[derive(Object)]
pub struct DeliveryResultDto {
    pub recipient: String,
    pub success: bool,
    pub attempts: u32,
    pub error: Option<String>,
}

#[derive(Object)]
pub struct BatchSendResponseDto {
    pub results: Vec<DeliveryResultDto>,
    pub failed_recipients: Vec<String>,
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    /// Repeated recipients in the request that were sent to only once.
    pub duplicates_skipped: u32,
    pub started_at: String,
    pub finished_at: String,
}

#[derive(Object)]
pub struct ResolvedRecipientDto {
    pub email: String,
    pub user_id: Option<String>,
}

#[derive(Object)]
pub struct ResolveRecipientsResponseDto {
    pub recipients: Vec<ResolvedRecipientDto>,
}

#[derive(Object)]
pub struct HealthDto {
    pub status: String,
    pub admission_capacity: u32,
    pub admission_available: u32,
}
