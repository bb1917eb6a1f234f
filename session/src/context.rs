//! Per-connection session state.

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};

/// Which side of the protocol a session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
}

/// Progress through the login sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Fresh,
    Handshaking,
    ProtocolNegotiated,
    LoggedIn,
    Authenticating,
    Ready,
}

impl SessionState {
    /// Returns `true` if a session may move from `self` to `next`.
    ///
    /// `Authenticating` may repeat while the peer asks for more credentials.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Fresh, Self::Handshaking)
                | (Self::Handshaking, Self::ProtocolNegotiated)
                | (Self::ProtocolNegotiated, Self::LoggedIn)
                | (Self::LoggedIn, Self::Authenticating | Self::Ready)
                | (Self::Authenticating, Self::Authenticating | Self::Ready)
        )
    }
}

/// State of one connection.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub role: Role,
    pub streamid: u16,
    pub config: SessionConfig,
    /// Remote address, when the transport has one.
    pub peer: Option<String>,
    /// Session id assigned at login.
    pub sessid: Option<Vec<u8>>,
    /// Continuation rounds seen during authentication.
    pub auth_rounds: usize,
    state: SessionState,
}

impl SessionContext {
    #[must_use]
    pub fn new(role: Role, config: SessionConfig) -> Self {
        Self {
            role,
            streamid: config.streamid,
            config,
            peer: None,
            sessid: None,
            auth_rounds: 0,
            state: SessionState::Fresh,
        }
    }

    #[must_use]
    pub fn with_peer(mut self, peer: impl Into<String>) -> Self {
        self.peer = Some(peer.into());
        self
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub fn transition(&mut self, next: SessionState) -> SessionResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        if next != self.state {
            tracing::info!(role = ?self.role, from = ?self.state, to = ?next, "session state");
        }
        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_sequence_transitions() {
        let mut ctx = SessionContext::new(Role::Client, SessionConfig::default());
        for next in [
            SessionState::Handshaking,
            SessionState::ProtocolNegotiated,
            SessionState::LoggedIn,
            SessionState::Authenticating,
            SessionState::Authenticating,
            SessionState::Ready,
        ] {
            ctx.transition(next).unwrap();
        }
        assert_eq!(ctx.state(), SessionState::Ready);
    }

    #[test]
    fn skipping_states_is_rejected() {
        let mut ctx = SessionContext::new(Role::Server, SessionConfig::default());
        let err = ctx.transition(SessionState::LoggedIn).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                from: SessionState::Fresh,
                to: SessionState::LoggedIn,
            }
        ));
    }

    #[test]
    fn ready_is_terminal() {
        assert!(!SessionState::Ready.can_transition_to(SessionState::Authenticating));
        assert!(SessionState::LoggedIn.can_transition_to(SessionState::Ready));
    }
}
