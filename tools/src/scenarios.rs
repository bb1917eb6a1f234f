//! Built-in scenarios.

use async_trait::async_trait;
use codec::{encode_record, MessageRecord};
use fuzzer::Fuzzer;
use schema::{ErrorCode, RequestKind};
use session::{
    requests, responses, BoxedStream, Client, ClientScenario, HandshakeReply, Server,
    ServerScenario, SessionResult,
};

/// Stat body served for `kXR_stat`: id, size, flags, modification time.
pub const STAT_DATA: &[u8] = b"2251804108717312 20480 51 1370444422\0";

/// Which scenario a runner plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenarioKind {
    Login,
    Fuzz,
}

/// Which request the fuzzing client mutates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FuzzTarget {
    /// The client handshake, sent before logging in.
    #[default]
    Handshake,
    /// `kXR_ping`, sent after a full login.
    Ping,
}

/// Logs in, then checks the server answers a ping.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginClient;

#[async_trait]
impl ClientScenario for LoginClient {
    async fn run(&self, client: &mut Client<BoxedStream>) -> SessionResult<()> {
        let outcome = client.do_full_handshake().await?;
        tracing::info!(
            sessid = %String::from_utf8_lossy(&outcome.sessid),
            auth_rounds = outcome.auth_rounds,
            "logged in"
        );
        let ping = requests::ping(client.registry(), client.context().streamid)?;
        let response = client.request(&ping).await?;
        tracing::info!(status = response.type_name(), "ping answered");
        Ok(())
    }
}

/// Sends fuzzed variants of one request and decodes every answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzClient {
    pub target: FuzzTarget,
}

#[async_trait]
impl ClientScenario for FuzzClient {
    async fn run(&self, client: &mut Client<BoxedStream>) -> SessionResult<()> {
        let registry = client.registry();
        let config = client.context().config.clone();
        let seed = match self.target {
            FuzzTarget::Handshake => requests::handshake(registry, config.handshake_version)?,
            FuzzTarget::Ping => {
                client.do_full_handshake().await?;
                requests::ping(registry, client.context().streamid)?
            }
        };
        let fuzzer = Fuzzer::new(client.codec().clone(), config.fuzz);
        let mut variants = fuzzer.fuzz_record(seed);
        tracing::info!(
            request = variants.seed().type_name(),
            iterations = variants.len(),
            rng_seed = variants.rng_seed(),
            "fuzzing"
        );
        while let Some(variant) = variants.next_record() {
            let response = client.request(&variant).await?;
            tracing::debug!(
                status = response.type_name(),
                streamid = response.streamid(),
                "fuzzed request answered"
            );
        }
        Ok(())
    }
}

/// Logs a client in, then answers `kXR_stat` and `kXR_ping` with `kXR_ok`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginServer;

#[async_trait]
impl ServerScenario for LoginServer {
    async fn run(&self, server: &mut Server<BoxedStream>) -> SessionResult<()> {
        server.do_full_handshake().await?;
        while let Some(request) = server.next_request().await? {
            let streamid = request.streamid();
            let response = match request.request_kind() {
                Some(RequestKind::Stat) => responses::ok(streamid, STAT_DATA)?,
                Some(RequestKind::Ping) => responses::ok(streamid, &[])?,
                _ => unsupported(server, &request)?,
            };
            server.respond(&response).await?;
        }
        Ok(())
    }
}

/// Answers every handshake with a handshake response of its own, the rest
/// of the login sequence request by request, and `kXR_chmod` and `kXR_stat`
/// with fuzzed responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzServer;

#[async_trait]
impl ServerScenario for FuzzServer {
    async fn run(&self, server: &mut Server<BoxedStream>) -> SessionResult<()> {
        let registry = server.registry();
        let fuzzer = Fuzzer::new(server.codec().clone(), server.context().config.fuzz.clone());
        while let Some(request) = server.next_request().await? {
            let streamid = request.streamid();
            let seed = match request.request_kind() {
                Some(
                    RequestKind::Handshake
                    | RequestKind::Protocol
                    | RequestKind::Login
                    | RequestKind::Auth,
                ) => {
                    server
                        .answer_login_request(&request, HandshakeReply::Alone)
                        .await?;
                    continue;
                }
                Some(RequestKind::Chmod) => {
                    responses::error(registry, streamid, ErrorCode::ArgInvalid, "")?
                }
                Some(RequestKind::Stat) => responses::ok(streamid, STAT_DATA)?,
                Some(RequestKind::Ping) => {
                    server.respond(&responses::ok(streamid, &[])?).await?;
                    continue;
                }
                _ => {
                    let response = unsupported(server, &request)?;
                    server.respond(&response).await?;
                    continue;
                }
            };
            let variants = fuzzer.fuzz_response(&encode_record(&seed)?, &request)?;
            tracing::info!(
                request = request.type_name(),
                iterations = variants.len(),
                rng_seed = variants.rng_seed(),
                "sending fuzzed responses"
            );
            for variant in variants {
                server.send_raw(&variant?).await?;
            }
        }
        Ok(())
    }
}

fn unsupported(
    server: &Server<BoxedStream>,
    request: &MessageRecord,
) -> SessionResult<MessageRecord> {
    tracing::warn!(request = request.type_name(), "unsupported request");
    Ok(responses::error(
        server.registry(),
        request.streamid(),
        ErrorCode::Unsupported,
        request.type_name(),
    )?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use schema::{Registry, ResponseStatus};
    use session::{NoAuth, SessionConfig};
    use tokio::io::duplex;

    use super::*;

    fn pair(config: SessionConfig) -> (Client<BoxedStream>, Server<BoxedStream>) {
        let (a, b) = duplex(64 * 1024);
        let registry = Registry::shared();
        (
            Client::new(Box::new(a), registry, config.clone(), Arc::new(NoAuth)),
            Server::new(Box::new(b), registry, config, Arc::new(NoAuth)),
        )
    }

    fn fuzz_config(iterations: usize) -> SessionConfig {
        let mut config = SessionConfig::default();
        config.fuzz.iterations = iterations;
        config.fuzz.seed = Some(7);
        config
    }

    #[tokio::test]
    async fn login_scenarios_talk_to_each_other() {
        let (mut client, mut server) = pair(SessionConfig::default());
        let server = tokio::spawn(async move { LoginServer.run(&mut server).await });

        LoginClient.run(&mut client).await.unwrap();
        drop(client);
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn fuzzed_pings_are_answered() {
        let (mut client, mut server) = pair(fuzz_config(5));
        let server = tokio::spawn(async move { LoginServer.run(&mut server).await });

        let scenario = FuzzClient {
            target: FuzzTarget::Ping,
        };
        scenario.run(&mut client).await.unwrap();
        drop(client);
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn fuzzed_handshakes_are_answered_one_by_one() {
        let (mut client, mut server) = pair(fuzz_config(5));
        let server = tokio::spawn(async move { FuzzServer.run(&mut server).await });

        let scenario = FuzzClient {
            target: FuzzTarget::Handshake,
        };
        scenario.run(&mut client).await.unwrap();
        drop(client);
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn fuzz_server_runs_the_login_sequence() {
        let (mut client, mut server) = pair(SessionConfig::default());
        let server = tokio::spawn(async move { FuzzServer.run(&mut server).await });

        let outcome = client.do_full_handshake().await.unwrap();
        assert_eq!(outcome.sessid.len(), 16);
        let ping = requests::ping(Registry::shared(), 1).unwrap();
        let response = client.request(&ping).await.unwrap();
        assert_eq!(response.status(), Some(ResponseStatus::Ok));
        drop(client);
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn stat_is_answered_with_fuzzed_responses() {
        let (mut client, mut server) = pair(fuzz_config(3));
        let server = tokio::spawn(async move { FuzzServer.run(&mut server).await });

        client.do_full_handshake().await.unwrap();
        let registry = Registry::shared();
        let stat = requests::stat(registry, 1, "/tmp").unwrap();
        client.send(&stat).await.unwrap();
        for _ in 0..3 {
            let raw = client.recv_raw().await.unwrap();
            assert_eq!(raw.len(), 8 + STAT_DATA.len());
            let dlen = i32::from_be_bytes([raw[4], raw[5], raw[6], raw[7]]);
            assert_eq!(usize::try_from(dlen).unwrap(), STAT_DATA.len());
        }
        drop(client);
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn unknown_requests_get_an_error() {
        let (mut client, mut server) = pair(SessionConfig::default());
        let server = tokio::spawn(async move { LoginServer.run(&mut server).await });

        client.do_full_handshake().await.unwrap();
        let chmod = requests::chmod(Registry::shared(), 1, "/tmp", 0o644).unwrap();
        let response = client.request(&chmod).await.unwrap();
        assert_eq!(response.status(), Some(ResponseStatus::Error));
        drop(client);
        server.await.unwrap().unwrap();
    }
}
