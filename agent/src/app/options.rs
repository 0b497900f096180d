//! Application configuration options

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::deploy::executor::{DispatchMode, EngineSettings};
use crate::errors::DeployError;
use crate::logs::LogLevel;
use crate::ssh::client::SshOptions;
use crate::store::mongo::StoreOptions;

/// Main application options, sourced from the environment
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// HTTP server configuration
    pub server: ServerOptions,

    /// Definition store location
    pub store: StoreOptions,

    /// SSH transport configuration
    pub ssh: SshOptions,

    /// Execution engine settings
    pub engine: EngineSettings,

    /// Log level
    pub log_level: LogLevel,

    /// Emit JSON-formatted logs
    pub log_json: bool,
}

/// HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Path segment of the deployment trigger route
    pub deploy_route: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            deploy_route: "deploy".to_string(),
        }
    }
}

impl AppOptions {
    /// Read options from the environment; unset optional variables keep
    /// their defaults, `MONGO_DB` and `MONGO_COLLECTION` are required
    pub fn from_env() -> Result<Self, DeployError> {
        let server_defaults = ServerOptions::default();
        let server = ServerOptions {
            host: env_or("HOST", server_defaults.host),
            port: env_parsed("PORT", server_defaults.port)?,
            deploy_route: env_or("DEPLOY_ROUTE", server_defaults.deploy_route),
        };

        let store_defaults = StoreOptions::default();
        let store = StoreOptions {
            host: env_or("MONGO_HOST", store_defaults.host),
            port: env_parsed("MONGO_PORT", store_defaults.port)?,
            database: env_required("MONGO_DB")?,
            collection: env_required("MONGO_COLLECTION")?,
        };

        let ssh_defaults = SshOptions::default();
        let ssh = SshOptions {
            port: env_parsed("SSH_PORT", ssh_defaults.port)?,
            connect_timeout: Duration::from_secs(env_parsed(
                "SSH_CONNECT_TIMEOUT_SECS",
                ssh_defaults.connect_timeout.as_secs(),
            )?),
            command_timeout: Duration::from_secs(env_parsed(
                "SSH_COMMAND_TIMEOUT_SECS",
                ssh_defaults.command_timeout.as_secs(),
            )?),
        };

        let engine = EngineSettings {
            dispatch: env_parsed("SCRIPT_DISPATCH", DispatchMode::default())?,
        };

        Ok(Self {
            server,
            store,
            ssh,
            engine,
            log_level: env_parsed("LOG_LEVEL", LogLevel::default())?,
            log_json: env_parsed("LOG_JSON", false)?,
        })
    }
}

fn env_or(name: &str, default: String) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

fn env_required(name: &str) -> Result<String, DeployError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DeployError::ConfigError(format!("{} must be set", name)))
}

fn env_parsed<T: FromStr>(name: &str, default: T) -> Result<T, DeployError> {
    match env::var(name) {
        Ok(raw) if !raw.is_empty() => raw
            .parse()
            .map_err(|_| DeployError::ConfigError(format!("invalid value for {}: {}", name, raw))),
        _ => Ok(default),
    }
}
