//! Server state

use std::sync::Arc;

use crate::deploy::executor::DeploymentEngine;
use crate::server::gate::AdmissionGate;
use crate::store::DefinitionStore;

/// Server state shared across handlers
pub struct ServerState {
    pub store: Arc<dyn DefinitionStore>,
    pub engine: Arc<DeploymentEngine>,
    pub gate: Arc<AdmissionGate>,
}

impl ServerState {
    pub fn new(
        store: Arc<dyn DefinitionStore>,
        engine: Arc<DeploymentEngine>,
        gate: Arc<AdmissionGate>,
    ) -> Self {
        Self { store, engine, gate }
    }
}
