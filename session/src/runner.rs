//! Runs scenarios over TCP, one task per connection.

use std::sync::Arc;

use schema::Registry;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;

use crate::auth::AuthBackend;
use crate::client::Client;
use crate::config::SessionConfig;
use crate::error::SessionResult;
use crate::scenario::{BoxedStream, ClientScenario, ServerScenario};
use crate::server::Server;

/// Outcome counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunReport {
    fn record(&mut self, connection: usize, result: SessionResult<()>) {
        match result {
            Ok(()) => {
                tracing::info!(connection, "connection finished");
                self.succeeded += 1;
            }
            Err(err) => {
                tracing::error!(connection, error = %err, "connection failed");
                self.failed += 1;
            }
        }
    }
}

/// Shared inputs of every connection in a run.
#[derive(Clone)]
pub struct Runner {
    registry: &'static Registry,
    config: SessionConfig,
    auth: Arc<dyn AuthBackend>,
}

impl Runner {
    pub fn new(
        registry: &'static Registry,
        config: SessionConfig,
        auth: Arc<dyn AuthBackend>,
    ) -> Self {
        Self {
            registry,
            config,
            auth,
        }
    }

    /// Opens `clients` connections to `address` and runs `scenario` on each.
    pub async fn run_active(
        &self,
        address: &str,
        clients: usize,
        scenario: Arc<dyn ClientScenario>,
    ) -> RunReport {
        let mut tasks = JoinSet::new();
        for connection in 0..clients {
            let runner = self.clone();
            let scenario = Arc::clone(&scenario);
            let address = address.to_string();
            tasks.spawn(async move {
                let result = runner.client_connection(&address, scenario).await;
                (connection, result)
            });
        }
        join_all(tasks).await
    }

    async fn client_connection(
        &self,
        address: &str,
        scenario: Arc<dyn ClientScenario>,
    ) -> SessionResult<()> {
        let stream = TcpStream::connect(address).await?;
        stream.set_nodelay(true)?;
        tracing::info!(address, "connected");
        let stream: BoxedStream = Box::new(stream);
        let mut client = Client::new(
            stream,
            self.registry,
            self.config.clone(),
            Arc::clone(&self.auth),
        );
        client.context_mut().peer = Some(address.to_string());
        scenario.run(&mut client).await
    }

    /// Accepts `clients` connections on `listener` and runs `scenario` on each.
    pub async fn run_passive(
        &self,
        listener: TcpListener,
        clients: usize,
        scenario: Arc<dyn ServerScenario>,
    ) -> SessionResult<RunReport> {
        let mut tasks = JoinSet::new();
        for connection in 0..clients {
            let (stream, peer) = listener.accept().await?;
            stream.set_nodelay(true)?;
            tracing::info!(%peer, connection, "accepted");
            let runner = self.clone();
            let scenario = Arc::clone(&scenario);
            tasks.spawn(async move {
                let stream: BoxedStream = Box::new(stream);
                let mut server = Server::new(
                    stream,
                    runner.registry,
                    runner.config.clone(),
                    Arc::clone(&runner.auth),
                );
                server.context_mut().peer = Some(peer.to_string());
                (connection, scenario.run(&mut server).await)
            });
        }
        Ok(join_all(tasks).await)
    }
}

async fn join_all(mut tasks: JoinSet<(usize, SessionResult<()>)>) -> RunReport {
    let mut report = RunReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((connection, result)) => report.record(connection, result),
            Err(err) => {
                tracing::error!(error = %err, "connection task panicked");
                report.failed += 1;
            }
        }
    }
    report
}
