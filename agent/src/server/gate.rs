//! Admission gate for trigger requests

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::errors::DeployError;

/// Bounds the number of trigger requests concurrently inside the handler.
///
/// The active limit is computed once at startup from the number of stored
/// definitions. Excess requests wait in FIFO order without bound and are
/// admitted one-for-one as active requests complete; a request is never
/// rejected, saturation shows up as latency only.
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    active_limit: usize,
}

impl AdmissionGate {
    /// Active limit is `round(1.5 x definition count)`, floored at 1 so an
    /// empty store does not freeze all traffic
    pub fn new(definition_count: usize) -> Self {
        let active_limit = ((definition_count as f64 * 1.5).round() as usize).max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(active_limit)),
            active_limit,
        }
    }

    pub fn active_limit(&self) -> usize {
        self.active_limit
    }

    /// Wait for admission; dropping the permit readmits the next waiter
    pub async fn admit(&self) -> Result<OwnedSemaphorePermit, DeployError> {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| DeployError::ServerError("admission gate closed".to_string()))
    }
}
