use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub recipient: String,
    pub success: bool,
    pub attempts: u32,
    /// Last failure reason; `None` on success.
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered(recipient: impl Into<String>, attempts: u32) -> Self {
        Self {
            recipient: recipient.into(),
            success: true,
            attempts,
            error: None,
        }
    }

    pub fn failed(recipient: impl Into<String>, attempts: u32, reason: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            success: false,
            attempts,
            error: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 * 100.0 / self.total as f64
    }
}

/// Final result of a batch run. `outcomes` is in input order and holds one
/// entry per distinct input recipient; repeats are only counted in
/// `duplicates_skipped`, so `total() + duplicates_skipped` is the input length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<DeliveryOutcome>,
    pub duplicates_skipped: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failed_recipients(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.success)
            .map(|o| o.recipient.as_str())
            .collect()
    }

    pub fn is_success(&self, recipient: &str) -> Option<bool> {
        self.outcomes
            .iter()
            .find(|o| o.recipient == recipient)
            .map(|o| o.success)
    }
}
