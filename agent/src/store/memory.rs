//! In-memory definition store
//!
//! Used by the test suite in place of a live MongoDB instance.

use async_trait::async_trait;

use crate::errors::DeployError;
use crate::models::deployment::Deployment;
use crate::store::DefinitionStore;

/// Fixed set of definitions held in memory
#[derive(Default)]
pub struct MemoryStore {
    definitions: Vec<Deployment>,
}

impl MemoryStore {
    pub fn new(definitions: Vec<Deployment>) -> Self {
        Self { definitions }
    }
}

#[async_trait]
impl DefinitionStore for MemoryStore {
    async fn find_by_key(&self, key: &str) -> Result<Vec<Deployment>, DeployError> {
        Ok(self
            .definitions
            .iter()
            .filter(|d| d.key == key)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, DeployError> {
        Ok(self.definitions.len() as u64)
    }
}
