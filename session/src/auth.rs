//! Pluggable authentication backends.

use async_trait::async_trait;

use crate::error::{SessionError, SessionResult};

/// Credentials a client presents in a `kXR_auth` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Protocol name, at most 4 bytes on the wire (`unix`, `krb5`, ...).
    pub kind: String,
    pub bytes: Vec<u8>,
}

/// Produces and checks credentials for both session roles.
///
/// Every method may fail with [`SessionError::Auth`], which ends the session.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Builds client credentials from the server's security token, or from
    /// continuation data on later rounds.
    async fn get_credentials(
        &self,
        token: &[u8],
        continuation: Option<&[u8]>,
        security_config: &str,
        peer: Option<&str>,
    ) -> SessionResult<Credentials>;

    /// Checks client credentials, returning continuation data when another
    /// round is needed.
    async fn authenticate(
        &self,
        credentials: &[u8],
        security_config: &str,
        peer: Option<&str>,
    ) -> SessionResult<Option<Vec<u8>>>;

    /// The security token a server puts in its login response.
    async fn security_token(&self, security_config: &str) -> SessionResult<Vec<u8>>;
}

/// Host-based `unix` authentication: the client names a user and group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnixAuth {
    pub user: String,
    pub group: String,
}

impl UnixAuth {
    pub const PROTOCOL: &'static str = "unix";
    pub const TOKEN: &'static [u8] = b"&P=unix\0";

    pub fn new(user: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: group.into(),
        }
    }
}

#[async_trait]
impl AuthBackend for UnixAuth {
    async fn get_credentials(
        &self,
        token: &[u8],
        _continuation: Option<&[u8]>,
        _security_config: &str,
        _peer: Option<&str>,
    ) -> SessionResult<Credentials> {
        let offered = token
            .split(|&b| b == b'&' || b == 0)
            .any(|part| part == b"P=unix");
        if !offered {
            return Err(SessionError::Auth {
                reason: format!(
                    "server does not offer unix authentication: {:?}",
                    String::from_utf8_lossy(token)
                ),
            });
        }
        let mut bytes = format!("{} {}", self.user, self.group).into_bytes();
        bytes.push(0);
        Ok(Credentials {
            kind: Self::PROTOCOL.to_string(),
            bytes,
        })
    }

    async fn authenticate(
        &self,
        _credentials: &[u8],
        _security_config: &str,
        peer: Option<&str>,
    ) -> SessionResult<Option<Vec<u8>>> {
        tracing::debug!(peer, "accepting unix credentials");
        Ok(None)
    }

    async fn security_token(&self, _security_config: &str) -> SessionResult<Vec<u8>> {
        Ok(Self::TOKEN.to_vec())
    }
}

/// No authentication: servers send an empty token and accept everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoAuth;

#[async_trait]
impl AuthBackend for NoAuth {
    async fn get_credentials(
        &self,
        _token: &[u8],
        _continuation: Option<&[u8]>,
        _security_config: &str,
        _peer: Option<&str>,
    ) -> SessionResult<Credentials> {
        Err(SessionError::Auth {
            reason: "no authentication protocol configured".to_string(),
        })
    }

    async fn authenticate(
        &self,
        _credentials: &[u8],
        _security_config: &str,
        _peer: Option<&str>,
    ) -> SessionResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn security_token(&self, _security_config: &str) -> SessionResult<Vec<u8>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unix_credentials() {
        let auth = UnixAuth::new("alice", "staff");
        let creds = auth
            .get_credentials(UnixAuth::TOKEN, None, "", None)
            .await
            .unwrap();
        assert_eq!(creds.kind, "unix");
        assert_eq!(creds.bytes, b"alice staff\0");
        assert_eq!(auth.authenticate(&creds.bytes, "", None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unix_requires_offer() {
        let auth = UnixAuth::new("alice", "staff");
        let err = auth
            .get_credentials(b"&P=krb5\0", None, "", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Auth { .. }));
    }

    #[tokio::test]
    async fn no_auth_has_empty_token() {
        assert!(NoAuth.security_token("").await.unwrap().is_empty());
        assert!(NoAuth.get_credentials(b"", None, "", None).await.is_err());
    }
}
