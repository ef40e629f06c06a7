use serde_json::Value;

use crate::{
    domain::models::{BatchReport, DeliveryOutcome, Message, MessageKind, ResolvedRecipient},
    presentation::http::responses::{BatchSendResponseDto, DeliveryResultDto, ResolvedRecipientDto},
};

pub fn map_message(kind: MessageKind, content: Value) -> Message {
    Message::new(kind, content)
}

pub fn map_outcome(outcome: &DeliveryOutcome) -> DeliveryResultDto {
    DeliveryResultDto {
        recipient: outcome.recipient.clone(),
        success: outcome.success,
        attempts: outcome.attempts,
        error: outcome.error.clone(),
    }
}

pub fn map_report(report: &BatchReport) -> BatchSendResponseDto {
    BatchSendResponseDto {
        results: report.outcomes.iter().map(map_outcome).collect(),
        failed_recipients: report
            .failed_recipients()
            .into_iter()
            .map(str::to_string)
            .collect(),
        total: report.total() as u32,
        successful: report.succeeded() as u32,
        failed: report.failed() as u32,
        duplicates_skipped: report.duplicates_skipped as u32,
        started_at: report.started_at.to_rfc3339(),
        finished_at: report.finished_at.to_rfc3339(),
    }
}

pub fn map_resolved(recipient: &ResolvedRecipient) -> ResolvedRecipientDto {
    ResolvedRecipientDto {
        email: recipient.email.clone(),
        user_id: recipient.user_id.clone(),
    }
}
