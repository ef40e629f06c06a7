use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::{StreamExt, stream};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    application::{
        handlers::message_dispatcher::MessageDispatchHandler,
        services::{encoder::encode, progress::ProgressSink},
    },
    domain::{
        errors::PayloadError,
        models::{BatchProgress, BatchReport, DeliveryOutcome, Message, ReceiveIdType, Recipient},
    },
};

pub struct SendBatchConfig {
    /// Deliveries polled at once; the admission gate still bounds requests.
    pub max_concurrent_deliveries: usize,
}

impl Default for SendBatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_deliveries: 64,
        }
    }
}

pub struct SendBatchUseCase {
    dispatcher: Arc<MessageDispatchHandler>,
    progress: Arc<dyn ProgressSink>,
    config: SendBatchConfig,
}

pub struct SendBatchRequest {
    pub recipients: Vec<String>,
    pub receive_id_type: ReceiveIdType,
    pub message: Message,
}

impl SendBatchUseCase {
    pub fn new(
        dispatcher: Arc<MessageDispatchHandler>,
        progress: Arc<dyn ProgressSink>,
        config: SendBatchConfig,
    ) -> Self {
        Self {
            dispatcher,
            progress,
            config,
        }
    }

    /// Delivers `request.message` to every recipient and returns once each
    /// one has an outcome. Only a malformed message fails the call; delivery
    /// failures are recorded in the report.
    pub async fn execute(
        &self,
        request: SendBatchRequest,
        cancel: &CancellationToken,
    ) -> Result<BatchReport, PayloadError> {
        let encoded = Arc::new(encode(&request.message)?);
        let requested = request.recipients.len();
        let recipients = distinct(request.recipients);
        let total = recipients.len();
        let duplicates_skipped = requested - total;
        let started_at = Utc::now();

        info!(total, duplicates_skipped, msg_type = encoded.kind.as_str(), "starting batch send");

        // Each delivery owns its handles so the batch future stays Send.
        let receive_id_type = request.receive_id_type;
        let dispatcher = self.dispatcher.clone();
        let cancel = cancel.clone();
        let mut deliveries = stream::iter(recipients.clone().into_iter().enumerate())
            .map(move |(index, id)| {
                let dispatcher = dispatcher.clone();
                let encoded = encoded.clone();
                let cancel = cancel.clone();
                async move {
                    let recipient = Recipient::new(id, receive_id_type);
                    let outcome = dispatcher.deliver(&recipient, &encoded, &cancel).await;
                    (index, outcome)
                }
            })
            .buffer_unordered(self.config.max_concurrent_deliveries.max(1));

        let mut slots: Vec<Option<DeliveryOutcome>> = vec![None; total];
        let mut completed = 0;
        while let Some((index, outcome)) = deliveries.next().await {
            completed += 1;
            self.progress
                .report(BatchProgress { completed, total }, &outcome);
            slots[index] = Some(outcome);
        }

        let outcomes: Vec<DeliveryOutcome> = slots
            .into_iter()
            .zip(recipients)
            .map(|(slot, recipient)| {
                slot.unwrap_or_else(|| DeliveryOutcome::failed(recipient, 0, "no outcome recorded"))
            })
            .collect();

        let report = BatchReport {
            outcomes,
            duplicates_skipped,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            total = report.total(),
            successful = report.succeeded(),
            failed = report.failed(),
            "batch send finished"
        );
        for recipient in report.failed_recipients() {
            error!(recipient, "recipient not reached");
        }

        Ok(report)
    }
}

/// Drops repeated recipients, keeping the first occurrence.
fn distinct(recipients: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(recipients.len());
    let mut unique = Vec::with_capacity(recipients.len());
    for recipient in recipients {
        if seen.insert(recipient.clone()) {
            unique.push(recipient);
        } else {
            warn!(recipient = %recipient, "duplicate recipient skipped");
        }
    }
    unique
}
