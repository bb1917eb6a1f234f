use codec::CodecError;
use thiserror::Error;

use crate::context::SessionState;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection closed after {received} of {expected} bytes")]
    ConnectionClosed { expected: usize, received: usize },

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("authentication failed: {reason}")]
    Auth { reason: String },

    #[error("login failed with {status}: {message}")]
    LoginFailed {
        status: &'static str,
        message: String,
    },

    #[error("authentication still incomplete after {rounds} continuation rounds")]
    AuthLoopExceeded { rounds: usize },

    #[error("expected {expected}, received {received}")]
    UnexpectedMessage {
        expected: &'static str,
        received: &'static str,
    },

    #[error("invalid session transition from {from:?} to {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<wire::DecodeError> for SessionError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Codec(CodecError::Wire(err))
    }
}

impl From<schema::SchemaError> for SessionError {
    fn from(err: schema::SchemaError) -> Self {
        Self::Codec(CodecError::Schema(err))
    }
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
