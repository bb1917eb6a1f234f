//! The server role.

use std::sync::Arc;

use codec::{encode_record, Codec, CodecError, MessageRecord};
use schema::{Registry, RequestKind, ServerFlags, DATA_SERVER};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::auth::AuthBackend;
use crate::config::SessionConfig;
use crate::context::{Role, SessionContext, SessionState};
use crate::error::{SessionError, SessionResult};
use crate::responses;
use crate::transport::MessageStream;

/// How a server answers the client handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeReply {
    /// Handshake and protocol responses in one write; the later
    /// `kXR_protocol` request gets no answer of its own.
    WithProtocol,
    /// Handshake response only; `kXR_protocol` is answered when it arrives.
    Alone,
}

/// A server session over `S`.
pub struct Server<S> {
    stream: MessageStream<S>,
    codec: Codec<'static>,
    ctx: SessionContext,
    auth: Arc<dyn AuthBackend>,
}

impl<S> Server<S>
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
            ctx: SessionContext::new(Role::Server, config),
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

    /// Receives and decodes the next request, or `None` once the client hangs up.
    pub async fn next_request(&mut self) -> SessionResult<Option<MessageRecord>> {
        let Some(frame) = self.stream.recv_request().await? else {
            tracing::debug!("client closed the connection");
            return Ok(None);
        };
        let decoded = self.codec.decode_request(&frame)?;
        if decoded.consumed != frame.len() {
            return Err(CodecError::TrailingData {
                schema: decoded.record.schema.name,
                declared: frame.len(),
                decoded: decoded.consumed,
            }
            .into());
        }
        let record = decoded.record;
        tracing::debug!(
            request = record.type_name(),
            streamid = record.streamid(),
            "received request"
        );
        Ok(Some(record))
    }

    /// Encodes and sends one response.
    pub async fn respond(&mut self, response: &MessageRecord) -> SessionResult<()> {
        self.respond_all(std::slice::from_ref(response)).await
    }

    /// Sends several responses in a single write.
    pub async fn respond_all(&mut self, responses: &[MessageRecord]) -> SessionResult<()> {
        let mut bytes = Vec::new();
        for response in responses {
            tracing::debug!(
                status = response.type_name(),
                streamid = response.streamid(),
                "sending response"
            );
            bytes.extend_from_slice(&encode_record(response)?);
        }
        self.stream.send(&bytes).await
    }

    /// Sends bytes as-is, for fuzzed or hand-crafted responses.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> SessionResult<()> {
        self.stream.send(bytes).await
    }

    /// Answers handshake, protocol, login and authentication requests until
    /// the client is logged in.
    ///
    /// The handshake is answered together with the protocol response. With
    /// `verify_auth` off, no security token is sent and any auth request is
    /// accepted.
    pub async fn do_full_handshake(&mut self) -> SessionResult<()> {
        loop {
            let Some(request) = self.next_request().await? else {
                return Err(SessionError::ConnectionClosed {
                    expected: wire::REQUEST_HEADER_SIZE,
                    received: 0,
                });
            };
            if self
                .answer_login_request(&request, HandshakeReply::WithProtocol)
                .await?
            {
                return Ok(());
            }
        }
    }

    /// Answers one handshake, protocol, login or auth request and returns
    /// `true` once the client is logged in.
    ///
    /// A handshake repeated before protocol negotiation is answered again.
    /// Any other request is an [`SessionError::UnexpectedMessage`].
    pub async fn answer_login_request(
        &mut self,
        request: &MessageRecord,
        reply: HandshakeReply,
    ) -> SessionResult<bool> {
        let config = self.ctx.config.clone();
        let registry = self.registry();
        let streamid = request.streamid();
        match request.request_kind() {
            Some(RequestKind::Handshake) => {
                if self.ctx.state() == SessionState::Handshaking {
                    tracing::debug!("repeated handshake");
                } else {
                    self.ctx.transition(SessionState::Handshaking)?;
                }
                let handshake =
                    responses::server_handshake(registry, wire::PROTOCOL_VERSION, DATA_SERVER)?;
                match reply {
                    HandshakeReply::WithProtocol => {
                        let protocol = responses::protocol(
                            registry,
                            0,
                            wire::PROTOCOL_VERSION,
                            ServerFlags::IS_SERVER,
                        )?;
                        self.respond_all(&[handshake, protocol]).await?;
                    }
                    HandshakeReply::Alone => self.respond(&handshake).await?,
                }
            }
            Some(RequestKind::Protocol) => {
                self.ctx.transition(SessionState::ProtocolNegotiated)?;
                if reply == HandshakeReply::Alone {
                    let protocol = responses::protocol(
                        registry,
                        streamid,
                        wire::PROTOCOL_VERSION,
                        ServerFlags::IS_SERVER,
                    )?;
                    self.respond(&protocol).await?;
                }
            }
            Some(RequestKind::Login) => {
                if self.ctx.state() == SessionState::Handshaking {
                    self.ctx.transition(SessionState::ProtocolNegotiated)?;
                }
                let sessid = responses::generate_sessid(&mut rand::thread_rng());
                let token = if config.verify_auth {
                    Some(self.auth.security_token(&config.security_config).await?)
                } else {
                    None
                };
                let sec = token.as_deref().filter(|token| !token.is_empty());
                let response = responses::login(registry, streamid, &sessid, sec)?;
                self.respond(&response).await?;
                self.ctx.sessid = Some(sessid.to_vec());
                self.ctx.transition(SessionState::LoggedIn)?;
                if sec.is_none() {
                    self.ctx.transition(SessionState::Ready)?;
                    return Ok(true);
                }
            }
            Some(RequestKind::Auth) => {
                self.ctx.transition(SessionState::Authenticating)?;
                let continuation = if config.verify_auth {
                    self.auth
                        .authenticate(
                            request.bytes("cred")?,
                            &config.security_config,
                            self.ctx.peer.as_deref(),
                        )
                        .await?
                } else {
                    None
                };
                if let Some(data) = continuation {
                    self.ctx.auth_rounds += 1;
                    if self.ctx.auth_rounds > config.max_auth_rounds {
                        return Err(SessionError::AuthLoopExceeded {
                            rounds: self.ctx.auth_rounds,
                        });
                    }
                    self.respond(&responses::authmore(registry, streamid, &data)?)
                        .await?;
                } else {
                    self.respond(&responses::ok(streamid, &[])?).await?;
                    self.ctx.transition(SessionState::Ready)?;
                    return Ok(true);
                }
            }
            _ => {
                tracing::warn!(request = request.type_name(), "request before login");
                return Err(SessionError::UnexpectedMessage {
                    expected: RequestKind::Login.name(),
                    received: request.type_name(),
                });
            }
        }
        Ok(false)
    }
}
