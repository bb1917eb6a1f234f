//! Session and scenario configuration.

use std::path::Path;

use fuzzer::FuzzConfig;
use serde::{Deserialize, Serialize};
use wire::Limits;

use crate::error::SessionResult;

/// Default cap on authentication continuation rounds.
pub const DEFAULT_MAX_AUTH_ROUNDS: usize = 16;

/// Per-connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub streamid: u16,
    /// Login name; truncated or zero-padded to 8 bytes on the wire.
    pub username: String,
    /// Last word of the client handshake.
    pub handshake_version: i32,
    pub max_auth_rounds: usize,
    /// Check client credentials with the auth backend instead of accepting them.
    pub verify_auth: bool,
    /// Opaque text handed to the auth backend.
    pub security_config: String,
    pub max_payload_bytes: usize,
    pub max_messages: usize,
    pub fuzz: FuzzConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            streamid: 1,
            username: "imposter".to_string(),
            handshake_version: wire::HANDSHAKE_WORDS[4],
            max_auth_rounds: DEFAULT_MAX_AUTH_ROUNDS,
            verify_auth: false,
            security_config: String::new(),
            max_payload_bytes: limits.max_payload_bytes,
            max_messages: limits.max_messages,
            fuzz: FuzzConfig::default(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub const fn limits(&self) -> Limits {
        Limits {
            max_payload_bytes: self.max_payload_bytes,
            max_messages: self.max_messages,
        }
    }
}

/// Whether a scenario connects out or accepts connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioRole {
    /// Connects to a server and plays the client.
    Active,
    /// Listens for clients and plays the server.
    Passive,
}

/// Where and how many times to run a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScenarioDescription {
    pub role: ScenarioRole,
    /// Host to connect to, or address to bind.
    pub host: String,
    pub port: u16,
    /// Connections to open or accept.
    #[serde(default = "default_clients")]
    pub clients: usize,
}

const fn default_clients() -> usize {
    1
}

impl ScenarioDescription {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings file: a scenario description plus session settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunConfig {
    pub scenario: ScenarioDescription,
    #[serde(default)]
    pub session: SessionConfig,
}

impl RunConfig {
    pub fn from_json(text: &str) -> SessionResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> SessionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
