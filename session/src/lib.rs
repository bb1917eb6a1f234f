//! Client and server session roles for xrdsim.
//!
//! A session drives one connection through the login sequence:
//! handshake, protocol negotiation, login and an optional authentication
//! loop. After that a scenario takes over and exchanges arbitrary requests
//! and responses built with the codec.
//!
//! # Features
//!
//! - Message framing over any `AsyncRead + AsyncWrite` stream
//! - Client and server state machines with a bounded authentication loop
//! - Pluggable authentication backends
//! - Request and response builders for common messages
//! - A runner that executes scenarios over TCP, one task per connection
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use schema::Registry;
//! use session::{Client, NoAuth, SessionConfig};
//!
//! # async fn run() -> session::SessionResult<()> {
//! let stream = tokio::net::TcpStream::connect("localhost:1094").await?;
//! let mut client = Client::new(stream, Registry::shared(), SessionConfig::default(), Arc::new(NoAuth));
//! let outcome = client.do_full_handshake().await?;
//! println!("session id {:?}", outcome.sessid);
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod config;
mod context;
mod error;
pub mod requests;
pub mod responses;
mod runner;
mod scenario;
mod server;
mod transport;

pub use auth::{AuthBackend, Credentials, NoAuth, UnixAuth};
pub use client::{Client, LoginOutcome};
pub use config::{
    RunConfig, ScenarioDescription, ScenarioRole, SessionConfig, DEFAULT_MAX_AUTH_ROUNDS,
};
pub use context::{Role, SessionContext, SessionState};
pub use error::{SessionError, SessionResult};
pub use responses::Compression;
pub use runner::{RunReport, Runner};
pub use scenario::{AsyncStream, BoxedStream, ClientScenario, ServerScenario};
pub use server::{HandshakeReply, Server};
pub use transport::MessageStream;
