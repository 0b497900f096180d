//! Deployment definition store

pub mod memory;
pub mod mongo;

use async_trait::async_trait;

use crate::errors::DeployError;
use crate::models::deployment::Deployment;

/// Lookup-by-key access to stored deployment definitions.
///
/// Definitions are created and mutated by the store's owner; the agent is a
/// pure consumer and never writes.
#[async_trait]
pub trait DefinitionStore: Send + Sync {
    /// All definitions whose key matches; duplicate keys are possible
    async fn find_by_key(&self, key: &str) -> Result<Vec<Deployment>, DeployError>;

    /// Number of stored definitions, used to size the admission gate
    async fn count(&self) -> Result<u64, DeployError>;
}
