use tracing::info;

use crate::domain::models::{BatchProgress, DeliveryOutcome};

/// Receives a progress update each time a batch records an outcome.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: BatchProgress, outcome: &DeliveryOutcome);
}

/// Logs progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, progress: BatchProgress, outcome: &DeliveryOutcome) {
        info!(
            completed = progress.completed,
            total = progress.total,
            recipient = %outcome.recipient,
            success = outcome.success,
            "progress: {}/{} ({:.1}%)",
            progress.completed,
            progress.total,
            progress.percent()
        );
    }
}
