use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::domain::errors::DispatchError;

/// Counting admission gate: at most `capacity` operations run at once.
#[derive(Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Capacity derived from a requests-per-second ceiling minus headroom.
    pub fn from_rate_ceiling(ceiling: usize, headroom: usize) -> Self {
        Self::new(ceiling.saturating_sub(headroom))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Runs `op` while holding one slot. The slot is released when `op`
    /// completes, fails, or is dropped mid-flight.
    pub async fn admit<F, T>(&self, op: F) -> Result<T, DispatchError>
    where
        F: Future<Output = Result<T, DispatchError>>,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DispatchError::Cancelled)?;
        op.await
    }
}
