//! Builders for the responses a server session sends.

use codec::{CodecResult, MessageBuilder, MessageRecord, ReadvSegment};
use rand::Rng;
use schema::{layouts, ActionCode, ErrorCode, MessageSchema, Registry, RequestKind, ResponseStatus};

/// Length of a login session id.
pub const SESSID_LEN: usize = 16;

/// Returns a random session id: 16 zero-padded decimal digits.
pub fn generate_sessid<R: Rng + ?Sized>(rng: &mut R) -> [u8; SESSID_LEN] {
    let value: u64 = rng.gen_range(0..10_000_000_000_000_000);
    let mut sessid = [0u8; SESSID_LEN];
    sessid.copy_from_slice(format!("{value:016}").as_bytes());
    sessid
}

fn ok_schema(registry: &Registry, kind: RequestKind) -> CodecResult<MessageSchema> {
    Ok(registry
        .ok_response_schema(kind)
        .ok_or_else(|| schema::SchemaError::UnknownSchema {
            name: schema::ok_response_schema_name(kind),
        })?
        .clone())
}

fn status_schema(registry: &Registry, status: ResponseStatus) -> CodecResult<MessageSchema> {
    Ok(registry
        .status_schema(status)
        .ok_or_else(|| schema::SchemaError::UnknownSchema {
            name: schema::status_schema_name(status),
        })?
        .clone())
}

fn attn_schema(registry: &Registry, action: ActionCode) -> CodecResult<MessageSchema> {
    Ok(codec::attn_schema(registry, action)?.clone())
}

fn buffer_schema(name: &str) -> CodecResult<MessageSchema> {
    Ok(MessageSchema::from_parts(
        name,
        &[layouts::RESPONSE_HEADER, layouts::BUFFER_RESPONSE],
    )?)
}

/// The server half of the handshake.
pub fn server_handshake(
    registry: &Registry,
    protover: i32,
    msgval: i32,
) -> CodecResult<MessageRecord> {
    let schema = registry.schema_for(schema::SERVER_HANDSHAKE_SCHEMA)?.clone();
    MessageBuilder::response(schema, ResponseStatus::Ok, 0)
        .set("protover", protover)
        .set("msgval", msgval)
        .build()
}

pub fn protocol(
    registry: &Registry,
    streamid: u16,
    pval: i32,
    flags: i32,
) -> CodecResult<MessageRecord> {
    MessageBuilder::response(
        ok_schema(registry, RequestKind::Protocol)?,
        ResponseStatus::Ok,
        streamid,
    )
    .set("pval", pval)
    .set("flags", flags)
    .build()
}

/// A login response; without a security token the `sec` field is omitted.
pub fn login(
    registry: &Registry,
    streamid: u16,
    sessid: &[u8; SESSID_LEN],
    sec: Option<&[u8]>,
) -> CodecResult<MessageRecord> {
    let mut schema = ok_schema(registry, RequestKind::Login)?;
    if sec.is_none() {
        schema = schema.without(&["sec"]);
    }
    let builder =
        MessageBuilder::response(schema, ResponseStatus::Ok, streamid).set("sessid", *sessid);
    match sec {
        Some(sec) => builder.set("sec", sec).build(),
        None => builder.build(),
    }
}

/// A plain `kXR_ok` carrying `data`.
pub fn ok(streamid: u16, data: &[u8]) -> CodecResult<MessageRecord> {
    MessageBuilder::response(buffer_schema("ok_response")?, ResponseStatus::Ok, streamid)
        .set("data", data)
        .build()
}

pub fn oksofar(streamid: u16, data: &[u8]) -> CodecResult<MessageRecord> {
    MessageBuilder::response(
        buffer_schema("oksofar_response")?,
        ResponseStatus::OkSoFar,
        streamid,
    )
    .set("data", data)
    .build()
}

/// A directory listing: entries separated by newlines.
pub fn dirlist(streamid: u16, entries: &[&str]) -> CodecResult<MessageRecord> {
    ok(streamid, entries.join("\n").as_bytes())
}

/// A locate answer: locations separated by spaces.
pub fn locate(streamid: u16, locations: &[&str]) -> CodecResult<MessageRecord> {
    ok(streamid, locations.join(" ").as_bytes())
}

/// A readv answer: each chunk header followed by its data.
pub fn readv(
    registry: &Registry,
    streamid: u16,
    segments: &[ReadvSegment],
) -> CodecResult<MessageRecord> {
    let data = codec::encode_readv_response(registry, segments)?;
    ok(streamid, &data)
}

/// Compression details of an open response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compression {
    pub cpsize: i32,
    pub cptype: [u8; 4],
}

/// An open response.
///
/// Stat data is only sent together with the compression fields, matching how
/// responses to `kXR_retstat` opens are laid out.
pub fn open(
    registry: &Registry,
    streamid: u16,
    fhandle: [u8; 4],
    compression: Option<Compression>,
    stat: Option<&[u8]>,
) -> CodecResult<MessageRecord> {
    let base = ok_schema(registry, RequestKind::Open)?;
    let schema = match (compression, stat) {
        (_, Some(_)) => base,
        (Some(_), None) => base.without(&["data"]),
        (None, None) => base.without(&["cpsize", "cptype", "data"]),
    };
    let mut builder =
        MessageBuilder::response(schema, ResponseStatus::Ok, streamid).set("fhandle", fhandle);
    if let Some(compression) = compression {
        builder = builder
            .set("cpsize", compression.cpsize)
            .set("cptype", compression.cptype);
    }
    if let Some(stat) = stat {
        builder = builder.set("data", stat);
    }
    builder.build()
}

pub fn bind(registry: &Registry, streamid: u16, pathid: u8) -> CodecResult<MessageRecord> {
    MessageBuilder::response(
        ok_schema(registry, RequestKind::Bind)?,
        ResponseStatus::Ok,
        streamid,
    )
    .set("pathid", [pathid])
    .build()
}

pub fn authmore(registry: &Registry, streamid: u16, data: &[u8]) -> CodecResult<MessageRecord> {
    MessageBuilder::response(
        status_schema(registry, ResponseStatus::AuthMore)?,
        ResponseStatus::AuthMore,
        streamid,
    )
    .set("data", data)
    .build()
}

pub fn error(
    registry: &Registry,
    streamid: u16,
    errnum: ErrorCode,
    errmsg: &str,
) -> CodecResult<MessageRecord> {
    MessageBuilder::response(
        status_schema(registry, ResponseStatus::Error)?,
        ResponseStatus::Error,
        streamid,
    )
    .set("errnum", errnum.code())
    .set("errmsg", errmsg)
    .build()
}

/// A redirect to `host:port`; opaque data and a token are appended to the host.
pub fn redirect(
    registry: &Registry,
    streamid: u16,
    port: i32,
    host: &str,
    opaque: &str,
    token: &str,
) -> CodecResult<MessageRecord> {
    MessageBuilder::response(
        status_schema(registry, ResponseStatus::Redirect)?,
        ResponseStatus::Redirect,
        streamid,
    )
    .set("port", port)
    .set("host", format!("{host}{opaque}{token}").as_str())
    .build()
}

pub fn wait(
    registry: &Registry,
    streamid: u16,
    seconds: i32,
    infomsg: &str,
) -> CodecResult<MessageRecord> {
    MessageBuilder::response(
        status_schema(registry, ResponseStatus::Wait)?,
        ResponseStatus::Wait,
        streamid,
    )
    .set("seconds", seconds)
    .set("infomsg", infomsg)
    .build()
}

pub fn waitresp(registry: &Registry, streamid: u16, seconds: i32) -> CodecResult<MessageRecord> {
    MessageBuilder::response(
        status_schema(registry, ResponseStatus::WaitResp)?,
        ResponseStatus::WaitResp,
        streamid,
    )
    .set("seconds", seconds)
    .build()
}

/// An attention message with the generic `actnum` + `parms` body
/// (abort, message, go and the other parameterless actions).
pub fn attn(registry: &Registry, action: ActionCode, parms: &[u8]) -> CodecResult<MessageRecord> {
    let schema = attn_schema(registry, action)?;
    MessageBuilder::response(schema, ResponseStatus::Attn, 0)
        .set("actnum", action.code())
        .set("parms", parms)
        .build()
}

pub fn attn_asyncrd(
    registry: &Registry,
    port: i32,
    host: &str,
    token: &str,
) -> CodecResult<MessageRecord> {
    MessageBuilder::response(
        attn_schema(registry, ActionCode::AsyncRd)?,
        ResponseStatus::Attn,
        0,
    )
    .set("actnum", ActionCode::AsyncRd.code())
    .set("port", port)
    .set("host", format!("{host}{token}").as_str())
    .build()
}

pub fn attn_asyncwt(registry: &Registry, wsec: i32) -> CodecResult<MessageRecord> {
    MessageBuilder::response(
        attn_schema(registry, ActionCode::AsyncWt)?,
        ResponseStatus::Attn,
        0,
    )
    .set("actnum", ActionCode::AsyncWt.code())
    .set("wsec", wsec)
    .build()
}

pub fn attn_asyncdi(registry: &Registry, wsec: i32, msec: i32) -> CodecResult<MessageRecord> {
    MessageBuilder::response(
        attn_schema(registry, ActionCode::AsyncDi)?,
        ResponseStatus::Attn,
        0,
    )
    .set("actnum", ActionCode::AsyncDi.code())
    .set("wsec", wsec)
    .set("msec", msec)
    .build()
}

/// Wraps an encoded response in a `kXR_asynresp` attention message.
pub fn attn_asynresp(registry: &Registry, embedded: &[u8]) -> CodecResult<MessageRecord> {
    let header = wire::ResponseHeader::decode(embedded)?;
    MessageBuilder::response(
        attn_schema(registry, ActionCode::AsynResp)?,
        ResponseStatus::Attn,
        0,
    )
    .set("actnum", ActionCode::AsynResp.code())
    .set("rsid", header.streamid)
    .set("rstatus", header.status)
    .set("rlen", header.dlen)
    .set("rdata", &embedded[wire::RESPONSE_HEADER_SIZE..])
    .build()
}
