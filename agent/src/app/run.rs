//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::app::options::AppOptions;
use crate::deploy::executor::DeploymentEngine;
use crate::errors::DeployError;
use crate::server::gate::AdmissionGate;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::ssh::client::SshClient;
use crate::store::mongo::MongoStore;
use crate::store::DefinitionStore;

/// Run the deployment agent until the shutdown signal fires
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DeployError> {
    info!("Initializing database connection...");
    let store = Arc::new(MongoStore::connect(&options.store).await?);

    let definition_count = store.count().await?;
    info!("Watching for {} deployment jobs.", definition_count);

    // The gate is sized once at startup; definitions added later do not
    // change the limit until the process restarts
    let gate = Arc::new(AdmissionGate::new(definition_count as usize));
    info!("Active requests limited to {}.", gate.active_limit());

    let client = Arc::new(SshClient::new(options.ssh.clone()));
    let engine = Arc::new(DeploymentEngine::new(client, options.engine.clone()));

    let state = Arc::new(ServerState::new(store, engine, gate));

    let handle = serve(&options.server, state, shutdown_signal).await?;
    handle
        .await
        .map_err(|e| DeployError::ServerError(e.to_string()))?
}
