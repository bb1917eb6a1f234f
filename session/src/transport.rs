//! Message framing over an async byte stream.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use wire::{
    is_handshake, Limits, RequestHeader, ResponseHeader, HANDSHAKE_SIZE, REQUEST_HEADER_SIZE,
    RESPONSE_HEADER_SIZE,
};

use crate::error::{SessionError, SessionResult};

/// Reads and writes whole protocol messages.
///
/// Reads loop until the declared length has arrived; a peer that closes
/// mid-message yields [`SessionError::ConnectionClosed`].
#[derive(Debug)]
pub struct MessageStream<S> {
    stream: S,
    limits: Limits,
}

impl<S> MessageStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub const fn new(stream: S, limits: Limits) -> Self {
        Self { stream, limits }
    }

    pub const fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Sends `bytes` as one write.
    pub async fn send(&mut self, bytes: &[u8]) -> SessionResult<()> {
        self.stream.write_all(bytes).await?;
        self.stream.flush().await?;
        tracing::debug!(len = bytes.len(), "sent");
        Ok(())
    }

    /// Receives one request frame, or `None` if the peer closed between messages.
    pub async fn recv_request(&mut self) -> SessionResult<Option<Vec<u8>>> {
        let mut frame = vec![0u8; HANDSHAKE_SIZE];
        if !self.fill_first(&mut frame).await? {
            return Ok(None);
        }
        if is_handshake(&frame) {
            tracing::debug!(len = frame.len(), "received handshake");
            return Ok(Some(frame));
        }
        frame.resize(REQUEST_HEADER_SIZE, 0);
        self.fill(&mut frame[HANDSHAKE_SIZE..], HANDSHAKE_SIZE).await?;
        let payload = RequestHeader::decode(&frame)?.payload_len(&self.limits)?;
        self.read_payload(&mut frame, payload).await?;
        tracing::debug!(len = frame.len(), "received request");
        Ok(Some(frame))
    }

    /// Receives one response frame.
    pub async fn recv_response(&mut self) -> SessionResult<Vec<u8>> {
        let mut frame = vec![0u8; RESPONSE_HEADER_SIZE];
        self.fill(&mut frame, 0).await?;
        let payload = ResponseHeader::decode(&frame)?.payload_len(&self.limits)?;
        self.read_payload(&mut frame, payload).await?;
        tracing::debug!(len = frame.len(), "received response");
        Ok(frame)
    }

    async fn read_payload(&mut self, frame: &mut Vec<u8>, payload: usize) -> SessionResult<()> {
        let header = frame.len();
        frame.resize(header + payload, 0);
        self.fill(&mut frame[header..], header).await
    }

    /// Fills `buf` completely; `already` counts bytes of this message read before.
    async fn fill(&mut self, buf: &mut [u8], already: usize) -> SessionResult<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.stream.read(&mut buf[filled..]).await?;
            if n == 0 {
                return Err(SessionError::ConnectionClosed {
                    expected: already + buf.len(),
                    received: already + filled,
                });
            }
            filled += n;
        }
        Ok(())
    }

    /// Like [`Self::fill`], but a close before the first byte returns `false`.
    async fn fill_first(&mut self, buf: &mut [u8]) -> SessionResult<bool> {
        let n = self.stream.read(buf).await?;
        if n == 0 {
            return Ok(false);
        }
        self.fill(&mut buf[n..], n).await?;
        Ok(true)
    }
}
