use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    application::services::{
        credentials::TokenCache,
        platform::{ApiStatus, OutboundMessage, PlatformApi},
        rate_limiter::AdmissionGate,
    },
    domain::{
        errors::DispatchError,
        models::{DeliveryOutcome, EncodedMessage, Recipient},
    },
};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Sends one encoded message to one recipient with retries.
///
/// Each attempt may refresh the tenant token once when the platform reports
/// it invalid; that refresh does not use up an attempt. Other failures are
/// retried after a fixed delay until the attempt budget runs out, so a
/// recipient sees at most `2 * max_attempts` send requests.
pub struct MessageDispatchHandler {
    platform: Arc<dyn PlatformApi>,
    tokens: Arc<TokenCache>,
    gate: AdmissionGate,
    policy: RetryPolicy,
}

impl MessageDispatchHandler {
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        tokens: Arc<TokenCache>,
        gate: AdmissionGate,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            platform,
            tokens,
            gate,
            policy,
        }
    }

    pub async fn deliver(
        &self,
        recipient: &Recipient,
        message: &EncodedMessage,
        cancel: &CancellationToken,
    ) -> DeliveryOutcome {
        // Same nonce on every attempt so the platform drops a duplicate whose
        // first response was lost.
        let nonce = Uuid::new_v4().to_string();
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(DispatchError::Cancelled),
                result = self.attempt(recipient, message, &nonce) => result,
            };

            let err = match result {
                Ok(()) => {
                    info!(recipient = %recipient.id, attempt, "message delivered");
                    return DeliveryOutcome::delivered(&recipient.id, attempt);
                }
                Err(err) => err,
            };

            if !err.is_retryable() || attempt >= max_attempts {
                error!(
                    recipient = %recipient.id,
                    attempts = attempt,
                    error = %err,
                    "failed to deliver message"
                );
                return DeliveryOutcome::failed(&recipient.id, attempt, err.to_string());
            }

            warn!(
                recipient = %recipient.id,
                attempt,
                max_attempts,
                error = %err,
                "delivery attempt failed, retrying"
            );

            let cancelled = tokio::select! {
                biased;
                _ = cancel.cancelled() => true,
                _ = tokio::time::sleep(self.policy.retry_delay) => false,
            };
            if cancelled {
                warn!(recipient = %recipient.id, attempts = attempt, "delivery cancelled");
                return DeliveryOutcome::failed(
                    &recipient.id,
                    attempt,
                    DispatchError::Cancelled.to_string(),
                );
            }
        }
    }

    async fn attempt(
        &self,
        recipient: &Recipient,
        message: &EncodedMessage,
        nonce: &str,
    ) -> Result<(), DispatchError> {
        let mut token = self.tokens.current().await?;
        let mut refreshed = false;

        loop {
            let request = OutboundMessage {
                recipient,
                message,
                nonce,
            };
            let status = self
                .gate
                .admit(self.platform.send_message(&token.value, request))
                .await?;

            match status {
                ApiStatus::Ok => return Ok(()),
                ApiStatus::TokenInvalid if !refreshed => {
                    debug!(recipient = %recipient.id, "tenant access token rejected, refreshing");
                    token = self.tokens.refresh(&token).await?;
                    refreshed = true;
                }
                ApiStatus::TokenInvalid => {
                    return Err(DispatchError::Auth(
                        "tenant access token rejected right after refresh".to_string(),
                    ));
                }
                ApiStatus::Rejected { code, msg } => {
                    return Err(DispatchError::Delivery { code, msg });
                }
            }
        }
    }
}
