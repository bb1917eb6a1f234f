//! The client role.

use std::sync::Arc;

use codec::{encode_record, Codec, MessageRecord};
use schema::{Registry, ResponseStatus};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::auth::AuthBackend;
use crate::config::SessionConfig;
use crate::context::{Role, SessionContext, SessionState};
use crate::error::{SessionError, SessionResult};
use crate::requests;
use crate::transport::MessageStream;

/// Result of a completed client login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub sessid: Vec<u8>,
    /// Auth requests sent after the first because the server asked for more.
    pub auth_rounds: usize,
}

/// A client session over `S`.
pub struct Client<S> {
    stream: MessageStream<S>,
    codec: Codec<'static>,
    ctx: SessionContext,
    auth: Arc<dyn AuthBackend>,
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(
        stream: S,
        registry: &'static Registry,
        config: SessionConfig,
        auth: Arc<dyn AuthBackend>,
    ) -> Self {
        let limits = config.limits();
        Self {
            stream: MessageStream::new(stream, limits.clone()),
            codec: Codec::with_limits(registry, limits),
            ctx: SessionContext::new(Role::Client, config),
            auth,
        }
    }

    pub const fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SessionContext {
        &mut self.ctx
    }

    pub const fn codec(&self) -> &Codec<'static> {
        &self.codec
    }

    pub const fn registry(&self) -> &'static Registry {
        self.codec.registry()
    }

    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }

    /// Encodes and sends one request.
    pub async fn send(&mut self, request: &MessageRecord) -> SessionResult<()> {
        let bytes = encode_record(request)?;
        tracing::debug!(
            request = request.type_name(),
            streamid = request.streamid(),
            len = bytes.len(),
            "sending request"
        );
        self.stream.send(&bytes).await
    }

    /// Sends bytes as-is, for fuzzed or hand-crafted requests.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> SessionResult<()> {
        self.stream.send(bytes).await
    }

    /// Receives one response frame without decoding it.
    pub async fn recv_raw(&mut self) -> SessionResult<Vec<u8>> {
        self.stream.recv_response().await
    }

    /// Receives and decodes the response to `request`.
    pub async fn recv_response(&mut self, request: &MessageRecord) -> SessionResult<MessageRecord> {
        let raw = self.stream.recv_response().await?;
        let record = self.codec.decode_response(&raw, request)?.record;
        tracing::debug!(
            request = request.type_name(),
            status = record.type_name(),
            streamid = record.streamid(),
            "received response"
        );
        Ok(record)
    }

    /// Sends `request` and waits for its response.
    pub async fn request(&mut self, request: &MessageRecord) -> SessionResult<MessageRecord> {
        self.send(request).await?;
        self.recv_response(request).await
    }

    /// Runs handshake, protocol, login and, if the server sends a security
    /// token, the authentication loop.
    pub async fn do_full_handshake(&mut self) -> SessionResult<LoginOutcome> {
        let config = self.ctx.config.clone();
        let registry = self.registry();
        let streamid = self.ctx.streamid;

        self.ctx.transition(SessionState::Handshaking)?;
        let handshake = requests::handshake(registry, config.handshake_version)?;
        let response = self.request(&handshake).await?;
        expect_ok(&response)?;
        tracing::debug!(
            protover = response.i32("protover")?,
            msgval = response.i32("msgval")?,
            "server handshake"
        );

        let protocol = requests::protocol(registry, streamid)?;
        let response = self.request(&protocol).await?;
        expect_ok(&response)?;
        self.ctx.transition(SessionState::ProtocolNegotiated)?;

        let login = requests::login(registry, streamid, &config.username, process_id())?;
        let response = self.request(&login).await?;
        if response.status() != Some(ResponseStatus::Ok) {
            return Err(login_failure(&response));
        }
        let sessid = response.bytes("sessid")?.to_vec();
        self.ctx.sessid = Some(sessid.clone());
        self.ctx.transition(SessionState::LoggedIn)?;

        let token = response.get("sec").and_then(codec::Value::as_bytes).unwrap_or_default();
        if !token.is_empty() {
            let token = token.to_vec();
            self.authenticate(&token, &config).await?;
        }

        self.ctx.transition(SessionState::Ready)?;
        Ok(LoginOutcome {
            sessid,
            auth_rounds: self.ctx.auth_rounds,
        })
    }

    async fn authenticate(&mut self, token: &[u8], config: &SessionConfig) -> SessionResult<()> {
        let registry = self.registry();
        let streamid = self.ctx.streamid;
        let mut continuation: Option<Vec<u8>> = None;
        self.ctx.transition(SessionState::Authenticating)?;
        loop {
            let credentials = self
                .auth
                .get_credentials(
                    token,
                    continuation.as_deref(),
                    &config.security_config,
                    self.ctx.peer.as_deref(),
                )
                .await?;
            let request = requests::auth(registry, streamid, &credentials.kind, &credentials.bytes)?;
            let response = self.request(&request).await?;
            match response.status() {
                Some(ResponseStatus::Ok) => return Ok(()),
                Some(ResponseStatus::AuthMore) => {
                    self.ctx.auth_rounds += 1;
                    if self.ctx.auth_rounds > config.max_auth_rounds {
                        tracing::warn!(rounds = self.ctx.auth_rounds, "authentication loop exceeded");
                        return Err(SessionError::AuthLoopExceeded {
                            rounds: self.ctx.auth_rounds,
                        });
                    }
                    self.ctx.transition(SessionState::Authenticating)?;
                    continuation = Some(response.bytes("data")?.to_vec());
                }
                _ => return Err(login_failure(&response)),
            }
        }
    }
}

fn expect_ok(response: &MessageRecord) -> SessionResult<()> {
    if response.status() == Some(ResponseStatus::Ok) {
        Ok(())
    } else {
        Err(SessionError::UnexpectedMessage {
            expected: ResponseStatus::Ok.name(),
            received: response.type_name(),
        })
    }
}

fn login_failure(response: &MessageRecord) -> SessionError {
    let message = response
        .get("errmsg")
        .and_then(codec::Value::as_bytes)
        .map(|msg| String::from_utf8_lossy(msg).trim_end_matches('\0').to_string())
        .unwrap_or_default();
    tracing::warn!(status = response.type_name(), %message, "login failed");
    SessionError::LoginFailed {
        status: response.type_name(),
        message,
    }
}

fn process_id() -> i32 {
    i32::try_from(std::process::id()).unwrap_or(i32::MAX)
}
