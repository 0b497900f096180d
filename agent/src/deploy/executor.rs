//! Deployment execution engine

use std::sync::Arc;

use futures::future::join_all;
use secrecy::SecretString;
use tracing::{info, warn};

use crate::deploy::locks::KeyLocks;
use crate::errors::DeployError;
use crate::models::deployment::{Deployment, ScriptLine};
use crate::models::outcome::{ExecutionResult, LineOutcome};
use crate::ssh::client::{RemoteClient, RemoteSession};

/// How the script lines of one deployment are dispatched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// Each line waits for the previous line's remote completion
    #[default]
    Sequential,

    /// All lines are launched at once over independent channels; later
    /// lines are not guaranteed to observe side effects of earlier ones
    Concurrent,
}

impl std::str::FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(DispatchMode::Sequential),
            "concurrent" => Ok(DispatchMode::Concurrent),
            _ => Err(format!("Invalid dispatch mode: {}", s)),
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub dispatch: DispatchMode,
}

/// Orchestrates one full deployment: session, script lines, aggregate result
pub struct DeploymentEngine {
    client: Arc<dyn RemoteClient>,
    settings: EngineSettings,
    locks: KeyLocks,
}

impl DeploymentEngine {
    pub fn new(client: Arc<dyn RemoteClient>, settings: EngineSettings) -> Self {
        Self {
            client,
            settings,
            locks: KeyLocks::new(),
        }
    }

    /// Execute every script line of the deployment against its host.
    ///
    /// Opens exactly one session and closes it on every exit path. A failing
    /// line is recorded in its result slot and never aborts the others; the
    /// call itself fails only when the session cannot be established.
    pub async fn execute(&self, deployment: &Deployment) -> Result<ExecutionResult, DeployError> {
        let _guard = self.locks.acquire(&deployment.key).await;

        info!("Executing auto-deploy for {}...", deployment.display_name());
        let session = self
            .client
            .connect(
                &deployment.vps_ip,
                &deployment.credentials.username,
                &deployment.credentials.password,
            )
            .await?;
        info!("Connected to {}.", deployment.vps_ip);

        let secret = &deployment.credentials.password;
        let outcomes = match self.settings.dispatch {
            DispatchMode::Sequential => {
                let mut outcomes = Vec::with_capacity(deployment.script_lines.len());
                for line in &deployment.script_lines {
                    outcomes.push(run_line(session.as_ref(), line, secret).await);
                }
                outcomes
            }
            DispatchMode::Concurrent => {
                // join_all keeps result slots in input order even when the
                // remote side completes them out of order
                join_all(
                    deployment
                        .script_lines
                        .iter()
                        .map(|line| run_line(session.as_ref(), line, secret)),
                )
                .await
            }
        };

        if let Err(e) = session.close().await {
            warn!("Failed to close session with {}: {}", deployment.vps_ip, e);
        }

        let result = ExecutionResult { outcomes };
        info!(
            "All scripts ({}) have been executed, {} failed.",
            result.outcomes.len(),
            result.failed_count()
        );
        Ok(result)
    }
}

/// Run a single script line on an open session, choosing the privileged
/// path when the line declares it. Transport errors land in the result slot
/// rather than aborting the execution.
pub async fn run_line(
    session: &dyn RemoteSession,
    line: &ScriptLine,
    secret: &SecretString,
) -> LineOutcome {
    let run = if line.password_required {
        session.run_privileged(&line.command, &line.args, secret).await
    } else {
        session.run_plain(&line.command, &line.args).await
    };
    match run {
        Ok(outcome) => LineOutcome::completed(&line.command, outcome),
        Err(e) => LineOutcome::failed(&line.command, e.to_string()),
    }
}
