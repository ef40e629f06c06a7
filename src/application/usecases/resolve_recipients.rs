use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    application::services::{
        credentials::TokenCache,
        platform::{LookupStatus, PlatformApi, UserLookup},
        rate_limiter::AdmissionGate,
    },
    domain::{
        errors::DispatchError,
        models::{ResolvedRecipient, UserIdType},
    },
};

/// Most emails the lookup endpoint accepts per call.
pub const LOOKUP_CHUNK_SIZE: usize = 50;

/// Maps emails to platform user ids. Only activated users resolve.
pub struct ResolveRecipientsUseCase {
    platform: Arc<dyn PlatformApi>,
    tokens: Arc<TokenCache>,
    gate: AdmissionGate,
}

pub struct ResolveRecipientsRequest {
    pub emails: Vec<String>,
    pub user_id_type: UserIdType,
}

impl ResolveRecipientsUseCase {
    pub fn new(platform: Arc<dyn PlatformApi>, tokens: Arc<TokenCache>, gate: AdmissionGate) -> Self {
        Self {
            platform,
            tokens,
            gate,
        }
    }

    /// Returns one entry per input email, in input order.
    pub async fn execute(
        &self,
        request: ResolveRecipientsRequest,
    ) -> Result<Vec<ResolvedRecipient>, DispatchError> {
        let mut resolved: HashMap<String, String> = HashMap::new();

        for chunk in request.emails.chunks(LOOKUP_CHUNK_SIZE) {
            for user in self.lookup_chunk(chunk, request.user_id_type).await? {
                if !user.is_activated {
                    debug!(email = %user.email, "skipping inactive user");
                    continue;
                }
                if let Some(user_id) = user.user_id {
                    resolved.entry(user.email.to_lowercase()).or_insert(user_id);
                }
            }
        }

        let recipients: Vec<ResolvedRecipient> = request
            .emails
            .into_iter()
            .map(|email| {
                let user_id = resolved.get(&email.to_lowercase()).cloned();
                ResolvedRecipient { email, user_id }
            })
            .collect();

        info!(
            requested = recipients.len(),
            resolved = recipients.iter().filter(|r| r.user_id.is_some()).count(),
            "resolved recipients"
        );
        Ok(recipients)
    }

    async fn lookup_chunk(
        &self,
        emails: &[String],
        user_id_type: UserIdType,
    ) -> Result<Vec<UserLookup>, DispatchError> {
        let mut token = self.tokens.current().await?;
        let mut refreshed = false;

        loop {
            let status = self
                .gate
                .admit(self.platform.lookup_users(&token.value, emails, user_id_type))
                .await?;

            match status {
                LookupStatus::Found(users) => return Ok(users),
                LookupStatus::TokenInvalid if !refreshed => {
                    token = self.tokens.refresh(&token).await?;
                    refreshed = true;
                }
                LookupStatus::TokenInvalid => {
                    return Err(DispatchError::Auth(
                        "tenant access token rejected right after refresh".to_string(),
                    ));
                }
                LookupStatus::Rejected { code, msg } => {
                    return Err(DispatchError::Delivery { code, msg });
                }
            }
        }
    }
}
