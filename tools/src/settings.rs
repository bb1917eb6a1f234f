//! Run settings: JSON file first, command-line flags on top.

use std::path::Path;

use anyhow::{Context, Result};
use session::{RunConfig, ScenarioDescription, ScenarioRole, SessionConfig};

const DEFAULT_CLIENT_HOST: &str = "localhost";
const DEFAULT_CLIENT_PORT: u16 = 1094;
const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 1095;

/// Values given on the command line; `None` keeps the file or default value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub clients: Option<usize>,
    pub username: Option<String>,
    pub verify_auth: bool,
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
}

impl RunOverrides {
    pub fn apply(&self, config: &mut RunConfig) {
        let scenario = &mut config.scenario;
        if let Some(host) = &self.host {
            scenario.host.clone_from(host);
        }
        if let Some(port) = self.port {
            scenario.port = port;
        }
        if let Some(clients) = self.clients {
            scenario.clients = clients;
        }

        let session = &mut config.session;
        if let Some(username) = &self.username {
            session.username.clone_from(username);
        }
        session.verify_auth |= self.verify_auth;
        if let Some(iterations) = self.iterations {
            session.fuzz.iterations = iterations;
        }
        if self.seed.is_some() {
            session.fuzz.seed = self.seed;
        }
    }
}

fn default_run_config(role: ScenarioRole) -> RunConfig {
    let (host, port) = match role {
        ScenarioRole::Active => (DEFAULT_CLIENT_HOST, DEFAULT_CLIENT_PORT),
        ScenarioRole::Passive => (DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT),
    };
    RunConfig {
        scenario: ScenarioDescription {
            role,
            host: host.to_string(),
            port,
            clients: 1,
        },
        session: SessionConfig::default(),
    }
}

/// Loads `path` (or the defaults for `role`) and applies `overrides`.
pub fn load_run_config(
    path: Option<&Path>,
    role: ScenarioRole,
    overrides: &RunOverrides,
) -> Result<RunConfig> {
    let mut config = match path {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("load run config {}", path.display()))?,
        None => default_run_config(role),
    };
    if config.scenario.role != role {
        tracing::warn!(
            configured = ?config.scenario.role,
            running = ?role,
            "config file role does not match the command"
        );
        config.scenario.role = role;
    }
    overrides.apply(&mut config);
    Ok(config)
}
