//! Deployment definition models
//!
//! Field names mirror the persisted MongoDB documents. Definitions are
//! created and mutated by the store's owner; this side only reads them.

use secrecy::SecretString;
use serde::Deserialize;

/// A deployment definition looked up by key on each trigger request
#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    /// Lookup key; the store does not enforce uniqueness
    pub key: String,

    /// Optional display label
    #[serde(default)]
    pub name: Option<String>,

    /// Address or hostname of the target machine
    pub vps_ip: String,

    /// SSH credentials; the password doubles as the elevation secret
    #[serde(rename = "vps_Credentials")]
    pub credentials: Credentials,

    /// Ordered script lines, never reordered or deduplicated
    #[serde(rename = "scriptLines")]
    pub script_lines: Vec<ScriptLine>,
}

impl Deployment {
    /// Label used in log output; unnamed definitions fall back to the key
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

/// Username/password pair for the target host
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// One command of a deployment script
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptLine {
    /// Executable or command name
    pub command: String,

    /// Command arguments; an absent array means "no arguments"
    #[serde(default)]
    pub args: Vec<String>,

    /// When true the command runs under a PTY with the secret on its input
    #[serde(rename = "passwordRequired", default)]
    pub password_required: bool,
}
