//! MongoDB-backed definition store

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Client, Collection};
use tracing::info;

use crate::errors::DeployError;
use crate::models::deployment::Deployment;
use crate::store::DefinitionStore;

/// Definition store location
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// MongoDB host
    pub host: String,

    /// MongoDB port
    pub port: u16,

    /// Database name
    pub database: String,

    /// Collection holding the deployment definitions
    pub collection: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 27017,
            database: String::new(),
            collection: String::new(),
        }
    }
}

/// Store backed by one MongoDB collection of deployment documents
pub struct MongoStore {
    collection: Collection<Deployment>,
}

impl MongoStore {
    /// Connect to the definition collection
    pub async fn connect(options: &StoreOptions) -> Result<Self, DeployError> {
        let uri = format!("mongodb://{}:{}", options.host, options.port);
        info!("Connecting to definition store at {}...", uri);

        let client = Client::with_uri_str(&uri)
            .await
            .map_err(|e| DeployError::LookupError(e.to_string()))?;
        let collection = client
            .database(&options.database)
            .collection(&options.collection);

        Ok(Self { collection })
    }
}

#[async_trait]
impl DefinitionStore for MongoStore {
    async fn find_by_key(&self, key: &str) -> Result<Vec<Deployment>, DeployError> {
        let cursor = self
            .collection
            .find(doc! { "key": key })
            .await
            .map_err(|e| DeployError::LookupError(e.to_string()))?;
        let definitions: Vec<Deployment> = cursor
            .try_collect()
            .await
            .map_err(|e| DeployError::LookupError(e.to_string()))?;
        Ok(definitions)
    }

    async fn count(&self) -> Result<u64, DeployError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(|e| DeployError::LookupError(e.to_string()))
    }
}
