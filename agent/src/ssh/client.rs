//! SSH remote session client
//!
//! One authenticated connection per deployment execution; script lines run
//! over individual channels of that connection. Commands needing elevation
//! run under a PTY with the secret written to the channel first.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client;
use russh::{ChannelMsg, Disconnect};
use russh_keys::key;
use secrecy::{ExposeSecret, SecretString};
use tokio::time::timeout;
use tracing::debug;

use crate::errors::DeployError;
use crate::models::outcome::CommandOutcome;
use crate::ssh::shell::assemble_command;

/// Opens authenticated sessions against remote hosts
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Connect and authenticate; no retry at this layer
    async fn connect(
        &self,
        host: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<Box<dyn RemoteSession>, DeployError>;
}

/// One authenticated connection, scoped to a single deployment execution
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Run a command as the authenticated user, no elevation
    async fn run_plain(
        &self,
        command: &str,
        args: &[String],
    ) -> Result<CommandOutcome, DeployError>;

    /// Run a command that expects an elevation prompt; the secret plus a
    /// line terminator is written to the channel under a PTY
    async fn run_privileged(
        &self,
        command: &str,
        args: &[String],
        secret: &SecretString,
    ) -> Result<CommandOutcome, DeployError>;

    /// Best-effort disconnect
    async fn close(&self) -> Result<(), DeployError>;
}

/// SSH transport options
#[derive(Debug, Clone)]
pub struct SshOptions {
    /// Remote SSH port
    pub port: u16,

    /// Bound on the handshake and authentication
    pub connect_timeout: Duration,

    /// Bound on a single remote command
    pub command_timeout: Duration,
}

impl Default for SshOptions {
    fn default() -> Self {
        Self {
            port: 22,
            connect_timeout: Duration::from_secs(30),
            command_timeout: Duration::from_secs(300),
        }
    }
}

struct ClientHandler;

#[async_trait]
impl client::Handler for ClientHandler {
    type Error = DeployError;

    async fn check_server_key(
        &mut self,
        _server_public_key: &key::PublicKey,
    ) -> Result<bool, Self::Error> {
        // Definitions carry no host-key material to pin against
        Ok(true)
    }
}

/// russh-backed client
pub struct SshClient {
    options: SshOptions,
}

impl SshClient {
    pub fn new(options: SshOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl RemoteClient for SshClient {
    async fn connect(
        &self,
        host: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<Box<dyn RemoteSession>, DeployError> {
        let config = Arc::new(client::Config::default());

        let mut handle = timeout(
            self.options.connect_timeout,
            client::connect(config, (host, self.options.port), ClientHandler),
        )
        .await
        .map_err(|_| {
            DeployError::ConnectionError(format!(
                "timed out connecting to {}:{}",
                host, self.options.port
            ))
        })?
        .map_err(|e| {
            DeployError::ConnectionError(format!("{}:{}: {}", host, self.options.port, e))
        })?;

        let authenticated = handle
            .authenticate_password(username, password.expose_secret())
            .await
            .map_err(|e| DeployError::ConnectionError(e.to_string()))?;
        if !authenticated {
            return Err(DeployError::AuthenticationError(format!(
                "password rejected for {}@{}",
                username, host
            )));
        }

        debug!("SSH session established with {}", host);
        Ok(Box::new(SshSession {
            handle,
            command_timeout: self.options.command_timeout,
        }))
    }
}

struct SshSession {
    handle: client::Handle<ClientHandler>,
    command_timeout: Duration,
}

impl SshSession {
    async fn run(
        &self,
        command_line: String,
        pty: bool,
        secret: Option<&SecretString>,
    ) -> Result<CommandOutcome, DeployError> {
        let mut channel = self.handle.channel_open_session().await?;
        if pty {
            channel.request_pty(false, "xterm", 80, 24, 0, 0, &[]).await?;
        }
        channel.exec(true, command_line.as_str()).await?;
        if let Some(secret) = secret {
            let line = format!("{}\n", secret.expose_secret());
            channel.data(line.as_bytes()).await?;
        }

        let drain = async move {
            let mut stdout = Vec::new();
            let mut stderr = Vec::new();
            let mut exit_code = None;
            while let Some(msg) = channel.wait().await {
                match msg {
                    ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                    ChannelMsg::ExtendedData { ref data, ext } if ext == 1 => {
                        stderr.extend_from_slice(data)
                    }
                    ChannelMsg::ExitStatus { exit_status } => exit_code = Some(exit_status),
                    _ => {}
                }
            }
            (stdout, stderr, exit_code)
        };
        let (stdout, stderr, exit_code) =
            timeout(self.command_timeout, drain).await.map_err(|_| {
                DeployError::SessionError(format!(
                    "remote command timed out after {:?}",
                    self.command_timeout
                ))
            })?;

        Ok(CommandOutcome {
            exit_code,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

#[async_trait]
impl RemoteSession for SshSession {
    async fn run_plain(
        &self,
        command: &str,
        args: &[String],
    ) -> Result<CommandOutcome, DeployError> {
        self.run(assemble_command(command, args), false, None).await
    }

    async fn run_privileged(
        &self,
        command: &str,
        args: &[String],
        secret: &SecretString,
    ) -> Result<CommandOutcome, DeployError> {
        self.run(assemble_command(command, args), true, Some(secret))
            .await
    }

    async fn close(&self) -> Result<(), DeployError> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await?;
        Ok(())
    }
}
