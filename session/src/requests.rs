//! Builders for the requests a client session sends.

use codec::{padded, CodecResult, MessageBuilder, MessageRecord};
use schema::{LoginCapability, Registry, RequestKind, ROLE_USER};

/// Length of the `username` field of a login request.
pub const USERNAME_LEN: usize = 8;

pub fn handshake(registry: &Registry, version: i32) -> CodecResult<MessageRecord> {
    MessageBuilder::request(registry, RequestKind::Handshake)?
        .set("fifth", version)
        .build()
}

pub fn protocol(registry: &Registry, streamid: u16) -> CodecResult<MessageRecord> {
    MessageBuilder::request(registry, RequestKind::Protocol)?
        .set("streamid", streamid)
        .set("clientpv", wire::PROTOCOL_VERSION)
        .build()
}

/// A user login with the current capability byte.
pub fn login(
    registry: &Registry,
    streamid: u16,
    username: &str,
    pid: i32,
) -> CodecResult<MessageRecord> {
    MessageBuilder::request(registry, RequestKind::Login)?
        .set("streamid", streamid)
        .set("pid", pid)
        .set("username", padded(username.as_bytes(), USERNAME_LEN))
        .set("capver", [LoginCapability::current().raw()])
        .set("role", [ROLE_USER])
        .build()
}

/// An authentication request carrying `credentials` of protocol `credtype`.
pub fn auth(
    registry: &Registry,
    streamid: u16,
    credtype: &str,
    credentials: &[u8],
) -> CodecResult<MessageRecord> {
    MessageBuilder::request(registry, RequestKind::Auth)?
        .set("streamid", streamid)
        .set("credtype", padded(credtype.as_bytes(), 4))
        .set("cred", credentials)
        .build()
}

pub fn ping(registry: &Registry, streamid: u16) -> CodecResult<MessageRecord> {
    MessageBuilder::request(registry, RequestKind::Ping)?
        .set("streamid", streamid)
        .build()
}

pub fn stat(registry: &Registry, streamid: u16, path: &str) -> CodecResult<MessageRecord> {
    MessageBuilder::request(registry, RequestKind::Stat)?
        .set("streamid", streamid)
        .set("path", path)
        .build()
}

pub fn chmod(
    registry: &Registry,
    streamid: u16,
    path: &str,
    mode: u16,
) -> CodecResult<MessageRecord> {
    MessageBuilder::request(registry, RequestKind::Chmod)?
        .set("streamid", streamid)
        .set("mode", mode)
        .set("path", path)
        .build()
}

pub fn open(
    registry: &Registry,
    streamid: u16,
    path: &str,
    mode: u16,
    options: u16,
) -> CodecResult<MessageRecord> {
    MessageBuilder::request(registry, RequestKind::Open)?
        .set("streamid", streamid)
        .set("mode", mode)
        .set("options", options)
        .set("path", path)
        .build()
}

/// A readv request for `chunks`.
pub fn readv(
    registry: &Registry,
    streamid: u16,
    chunks: &[codec::ReadChunk],
) -> CodecResult<MessageRecord> {
    let list = codec::encode_read_list(registry, chunks)?;
    MessageBuilder::request(registry, RequestKind::Readv)?
        .set("streamid", streamid)
        .set("data", list)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_pads_username() {
        let record = login(Registry::shared(), 1, "bob", 42).unwrap();
        assert_eq!(record.bytes("username").unwrap(), b"bob\0\0\0\0\0");
        assert_eq!(record.bytes("capver").unwrap(), &[131]);
        assert_eq!(record.bytes("role").unwrap(), b"0");
        assert_eq!(record.i32("dlen").unwrap(), 0);
    }

    #[test]
    fn auth_carries_credentials() {
        let record = auth(Registry::shared(), 1, "unix", b"bob users\0").unwrap();
        assert_eq!(record.bytes("credtype").unwrap(), b"unix");
        assert_eq!(record.i32("dlen").unwrap(), 10);
    }

    #[test]
    fn handshake_is_twenty_bytes() {
        let record = handshake(Registry::shared(), 2012).unwrap();
        assert_eq!(codec::encode_record(&record).unwrap().len(), 20);
    }

    #[test]
    fn readv_encodes_chunk_list() {
        let chunk = codec::ReadChunk {
            fhandle: [0, 0, 0, 1],
            len: 10,
            offset: 0,
        };
        let record = readv(Registry::shared(), 1, &[chunk, chunk]).unwrap();
        assert_eq!(record.i32("dlen").unwrap(), 32);
    }
}
