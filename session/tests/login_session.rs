use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use codec::encode_record;
use schema::{ErrorCode, Registry, RequestKind, ResponseStatus};
use session::{
    requests, responses, AuthBackend, Client, Credentials, HandshakeReply, NoAuth, Server,
    SessionConfig, SessionError, SessionResult, SessionState, UnixAuth,
};
use tokio::io::{duplex, DuplexStream};

/// Asks for `rounds` continuations before accepting.
struct ScriptedAuth {
    rounds: usize,
    seen: AtomicUsize,
}

impl ScriptedAuth {
    fn new(rounds: usize) -> Self {
        Self {
            rounds,
            seen: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuthBackend for ScriptedAuth {
    async fn get_credentials(
        &self,
        _token: &[u8],
        continuation: Option<&[u8]>,
        _security_config: &str,
        _peer: Option<&str>,
    ) -> SessionResult<Credentials> {
        let bytes = match continuation {
            Some(data) => [b"cont:".as_slice(), data].concat(),
            None => b"first".to_vec(),
        };
        Ok(Credentials {
            kind: "test".to_string(),
            bytes,
        })
    }

    async fn authenticate(
        &self,
        _credentials: &[u8],
        _security_config: &str,
        _peer: Option<&str>,
    ) -> SessionResult<Option<Vec<u8>>> {
        let seen = self.seen.fetch_add(1, Ordering::SeqCst);
        Ok((seen < self.rounds).then(|| format!("round{seen}").into_bytes()))
    }

    async fn security_token(&self, _security_config: &str) -> SessionResult<Vec<u8>> {
        Ok(b"&P=test\0".to_vec())
    }
}

fn pair(
    client_config: SessionConfig,
    client_auth: Arc<dyn AuthBackend>,
    server_config: SessionConfig,
    server_auth: Arc<dyn AuthBackend>,
) -> (Client<DuplexStream>, Server<DuplexStream>) {
    let (a, b) = duplex(64 * 1024);
    (
        Client::new(a, Registry::shared(), client_config, client_auth),
        Server::new(b, Registry::shared(), server_config, server_auth),
    )
}

fn verifying() -> SessionConfig {
    SessionConfig {
        verify_auth: true,
        ..SessionConfig::default()
    }
}

#[tokio::test]
async fn handshake_and_protocol_values() {
    let (mut client, mut server) = pair(
        SessionConfig::default(),
        Arc::new(NoAuth),
        SessionConfig::default(),
        Arc::new(NoAuth),
    );
    let server = tokio::spawn(async move { server.do_full_handshake().await });

    let registry = Registry::shared();
    let handshake = requests::handshake(registry, 2012).unwrap();
    let response = client.request(&handshake).await.unwrap();
    assert_eq!(response.i32("protover").unwrap(), 663);
    assert_eq!(response.i32("msgval").unwrap(), 1);

    let protocol = requests::protocol(registry, 1).unwrap();
    let response = client.request(&protocol).await.unwrap();
    assert_eq!(response.i32("pval").unwrap(), 0x297);
    assert_eq!(response.i32("flags").unwrap(), 1);

    drop(client);
    assert!(server.await.unwrap().is_err());
}

#[tokio::test]
async fn login_without_auth() {
    let (mut client, mut server) = pair(
        SessionConfig::default(),
        Arc::new(NoAuth),
        SessionConfig::default(),
        Arc::new(NoAuth),
    );
    let server = tokio::spawn(async move {
        server.do_full_handshake().await.map(|()| server.context().state())
    });

    let outcome = client.do_full_handshake().await.unwrap();
    assert_eq!(outcome.auth_rounds, 0);
    assert_eq!(outcome.sessid.len(), 16);
    assert!(outcome.sessid.iter().all(u8::is_ascii_digit));
    assert_eq!(client.context().state(), SessionState::Ready);
    assert_eq!(server.await.unwrap().unwrap(), SessionState::Ready);
}

#[tokio::test]
async fn authmore_twice_then_ok() {
    let server_auth = Arc::new(ScriptedAuth::new(2));
    let (mut client, mut server) = pair(
        SessionConfig::default(),
        Arc::new(ScriptedAuth::new(0)),
        verifying(),
        server_auth.clone(),
    );
    let server = tokio::spawn(async move { server.do_full_handshake().await });

    let outcome = client.do_full_handshake().await.unwrap();
    assert_eq!(outcome.auth_rounds, 2);
    assert_eq!(client.context().state(), SessionState::Ready);
    server.await.unwrap().unwrap();
    assert_eq!(server_auth.seen.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn authmore_loop_is_bounded() {
    let client_config = SessionConfig {
        max_auth_rounds: 3,
        ..SessionConfig::default()
    };
    let (mut client, mut server) = pair(
        client_config,
        Arc::new(ScriptedAuth::new(0)),
        verifying(),
        Arc::new(ScriptedAuth::new(usize::MAX)),
    );
    let server = tokio::spawn(async move { server.do_full_handshake().await });

    let err = client.do_full_handshake().await.unwrap_err();
    assert!(matches!(err, SessionError::AuthLoopExceeded { rounds: 4 }));
    drop(client);
    assert!(server.await.unwrap().is_err());
}

#[tokio::test]
async fn unix_auth_round_trip() {
    let (mut client, mut server) = pair(
        SessionConfig::default(),
        Arc::new(UnixAuth::new("imposter", "users")),
        verifying(),
        Arc::new(UnixAuth::new("server", "server")),
    );
    let server = tokio::spawn(async move { server.do_full_handshake().await });

    let outcome = client.do_full_handshake().await.unwrap();
    assert_eq!(outcome.auth_rounds, 0);
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn login_error_is_reported() {
    let (mut client, mut server) = pair(
        SessionConfig::default(),
        Arc::new(NoAuth),
        SessionConfig::default(),
        Arc::new(NoAuth),
    );
    let server = tokio::spawn(async move {
        let registry = Registry::shared();
        while let Some(request) = server.next_request().await? {
            match request.request_kind() {
                Some(RequestKind::Handshake) => {
                    let handshake = responses::server_handshake(registry, 663, 1)?;
                    let protocol = responses::protocol(registry, 0, 0x297, 1)?;
                    server.respond_all(&[handshake, protocol]).await?;
                }
                Some(RequestKind::Login) => {
                    let error = responses::error(
                        registry,
                        request.streamid(),
                        ErrorCode::NotAuthorized,
                        "go away",
                    )?;
                    server.respond(&error).await?;
                }
                _ => {}
            }
        }
        Ok::<(), SessionError>(())
    });

    let err = client.do_full_handshake().await.unwrap_err();
    match err {
        SessionError::LoginFailed { status, message } => {
            assert_eq!(status, ResponseStatus::Error.name());
            assert_eq!(message, "go away");
        }
        other => panic!("unexpected error: {other}"),
    }
    drop(client);
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn piggybacked_requests_arrive_separately() {
    let (mut client, mut server) = pair(
        SessionConfig::default(),
        Arc::new(NoAuth),
        SessionConfig::default(),
        Arc::new(NoAuth),
    );
    let registry = Registry::shared();
    let mut bytes = encode_record(&requests::stat(registry, 7, "/tmp").unwrap()).unwrap();
    bytes.extend_from_slice(&encode_record(&requests::ping(registry, 7).unwrap()).unwrap());
    client.send_raw(&bytes).await.unwrap();

    let first = server.next_request().await.unwrap().unwrap();
    let second = server.next_request().await.unwrap().unwrap();
    assert_eq!(first.type_name(), "kXR_stat");
    assert_eq!(second.type_name(), "kXR_ping");
    assert_eq!((first.streamid(), second.streamid()), (7, 7));

    drop(client);
    assert!(server.next_request().await.unwrap().is_none());
}

#[tokio::test]
async fn requests_before_login_are_rejected() {
    let (mut client, mut server) = pair(
        SessionConfig::default(),
        Arc::new(NoAuth),
        SessionConfig::default(),
        Arc::new(NoAuth),
    );
    let registry = Registry::shared();
    client
        .send(&requests::ping(registry, 1).unwrap())
        .await
        .unwrap();
    let err = server.do_full_handshake().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::UnexpectedMessage {
            expected: "kXR_login",
            received: "kXR_ping",
        }
    ));
}

#[tokio::test]
async fn repeated_handshakes_are_answered_alone() {
    let (mut client, mut server) = pair(
        SessionConfig::default(),
        Arc::new(NoAuth),
        SessionConfig::default(),
        Arc::new(NoAuth),
    );
    let server = tokio::spawn(async move {
        while let Some(request) = server.next_request().await? {
            if server
                .answer_login_request(&request, HandshakeReply::Alone)
                .await?
            {
                break;
            }
        }
        Ok::<SessionState, SessionError>(server.context().state())
    });

    let registry = Registry::shared();
    let handshake = requests::handshake(registry, 2012).unwrap();
    for _ in 0..3 {
        let response = client.request(&handshake).await.unwrap();
        assert_eq!(response.schema.name, "server_handshake");
        assert_eq!(response.i32("protover").unwrap(), 663);
    }
    let protocol = requests::protocol(registry, 1).unwrap();
    let response = client.request(&protocol).await.unwrap();
    assert_eq!(response.schema.name, "protocol_response");
    assert_eq!(response.streamid(), 1);

    let login = requests::login(registry, 1, "imposter", 42).unwrap();
    let response = client.request(&login).await.unwrap();
    assert_eq!(response.status(), Some(ResponseStatus::Ok));
    assert_eq!(server.await.unwrap().unwrap(), SessionState::Ready);
}
