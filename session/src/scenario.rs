//! Scenario entry points.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::client::Client;
use crate::error::SessionResult;
use crate::server::Server;

/// Any bidirectional byte stream a session can run over.
pub trait AsyncStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> AsyncStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// Type-erased stream used by scenarios, so one scenario runs over TCP or in memory.
pub type BoxedStream = Box<dyn AsyncStream>;

/// A test script that plays the client side of one connection.
#[async_trait]
pub trait ClientScenario: Send + Sync {
    async fn run(&self, client: &mut Client<BoxedStream>) -> SessionResult<()>;
}

/// A test script that plays the server side of one connection.
#[async_trait]
pub trait ServerScenario: Send + Sync {
    async fn run(&self, server: &mut Server<BoxedStream>) -> SessionResult<()>;
}
