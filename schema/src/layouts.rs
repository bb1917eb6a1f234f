//! Static message layouts.
//!
//! Request layouts list the fields after the request header; response
//! layouts list the body after the response header. The registry stitches
//! headers and bodies together into full message schemas.

use crate::field::FieldSpec;

pub const REQUEST_HEADER: &[FieldSpec] = &[
    FieldSpec::u16("streamid"),
    FieldSpec::u16("requestid").frozen(),
];

pub const RESPONSE_HEADER: &[FieldSpec] = &[
    FieldSpec::u16("streamid"),
    FieldSpec::u16("status"),
    FieldSpec::i32("dlen").frozen(),
];

/// The complete 20-byte client handshake; only the last word varies.
pub const CLIENT_HANDSHAKE: &[FieldSpec] = &[
    FieldSpec::i32("first").frozen(),
    FieldSpec::i32("second").frozen(),
    FieldSpec::i32("third").frozen(),
    FieldSpec::i32("fourth").frozen(),
    FieldSpec::i32("fifth"),
];

pub const SERVER_HANDSHAKE_BODY: &[FieldSpec] =
    &[FieldSpec::i32("protover"), FieldSpec::i32("msgval")];

/// One readv chunk header.
pub const READ_LIST: &[FieldSpec] = &[
    FieldSpec::fixed("fhandle", 4),
    FieldSpec::i32("len"),
    FieldSpec::i64("offset"),
];

const DLEN: FieldSpec = FieldSpec::i32("dlen").frozen();

const RESERVED_ONLY: &[FieldSpec] = &[FieldSpec::fixed("reserved", 16), DLEN];

const PATH_ONLY: &[FieldSpec] = &[
    FieldSpec::fixed("reserved", 16),
    DLEN,
    FieldSpec::dlen_sized("path"),
];

const SESSION_ONLY: &[FieldSpec] = &[FieldSpec::fixed("sessid", 16), DLEN];

const FILE_TRANSFER: &[FieldSpec] = &[
    FieldSpec::i32("options"),
    FieldSpec::fixed("reserved", 8),
    FieldSpec::i32("buffsz"),
    DLEN,
];

pub const ADMIN_REQUEST: &[FieldSpec] = RESERVED_ONLY;

pub const AUTH_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("reserved", 12),
    FieldSpec::fixed("credtype", 4),
    DLEN,
    FieldSpec::dlen_sized("cred"),
];

pub const BIND_REQUEST: &[FieldSpec] = SESSION_ONLY;

pub const CHMOD_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("reserved", 14),
    FieldSpec::u16("mode"),
    DLEN,
    FieldSpec::dlen_sized("path"),
];

pub const CLOSE_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("fhandle", 4),
    FieldSpec::i64("fsize"),
    FieldSpec::fixed("reserved", 4),
    DLEN,
];

pub const DIRLIST_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("reserved", 15),
    FieldSpec::fixed("options", 1),
    DLEN,
    FieldSpec::dlen_sized("path"),
];

pub const ENDSESS_REQUEST: &[FieldSpec] = SESSION_ONLY;

pub const GETFILE_REQUEST: &[FieldSpec] = FILE_TRANSFER;

pub const LOCATE_REQUEST: &[FieldSpec] = &[
    FieldSpec::u16("options"),
    FieldSpec::fixed("reserved", 14),
    DLEN,
    FieldSpec::dlen_sized("path"),
];

pub const LOGIN_REQUEST: &[FieldSpec] = &[
    FieldSpec::i32("pid"),
    FieldSpec::fixed("username", 8),
    FieldSpec::fixed("reserved", 1),
    FieldSpec::fixed("zone", 1),
    FieldSpec::fixed("capver", 1),
    FieldSpec::fixed("role", 1),
    DLEN,
    FieldSpec::dlen_sized("token"),
];

pub const MKDIR_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("options", 1),
    FieldSpec::fixed("reserved", 13),
    FieldSpec::u16("mode"),
    DLEN,
    FieldSpec::dlen_sized("path"),
];

pub const MV_REQUEST: &[FieldSpec] = PATH_ONLY;

pub const OPEN_REQUEST: &[FieldSpec] = &[
    FieldSpec::u16("mode"),
    FieldSpec::u16("options"),
    FieldSpec::fixed("reserved", 12),
    DLEN,
    FieldSpec::dlen_sized("path"),
];

pub const PING_REQUEST: &[FieldSpec] = RESERVED_ONLY;

pub const PROTOCOL_REQUEST: &[FieldSpec] = &[
    FieldSpec::i32("clientpv"),
    FieldSpec::fixed("reserved", 12),
    DLEN,
];

pub const PREPARE_REQUEST: &[FieldSpec] = &[
    FieldSpec::u8("options"),
    FieldSpec::u8("prty"),
    FieldSpec::u16("port"),
    FieldSpec::fixed("reserved", 12),
    DLEN,
    FieldSpec::dlen_sized("plist"),
];

pub const PUTFILE_REQUEST: &[FieldSpec] = FILE_TRANSFER;

pub const QUERY_REQUEST: &[FieldSpec] = &[
    FieldSpec::u16("reqcode"),
    FieldSpec::fixed("reserved1", 2),
    FieldSpec::fixed("fhandle", 4),
    FieldSpec::fixed("reserved2", 8),
    DLEN,
    FieldSpec::dlen_sized("args"),
];

/// The optional `args` block carries the path id and read-ahead lists.
pub const READ_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("fhandle", 4).frozen(),
    FieldSpec::i64("offset"),
    FieldSpec::i32("rlen").frozen(),
    DLEN,
    FieldSpec::dlen_sized("args").frozen(),
];

pub const READV_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("reserved", 15),
    FieldSpec::fixed("pathid", 1),
    DLEN,
    FieldSpec::dlen_sized("data").frozen(),
];

pub const RM_REQUEST: &[FieldSpec] = PATH_ONLY;

pub const RMDIR_REQUEST: &[FieldSpec] = PATH_ONLY;

pub const SET_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("reserved", 16),
    DLEN,
    FieldSpec::dlen_sized("data"),
];

pub const STAT_REQUEST: &[FieldSpec] = &[
    FieldSpec::u8("options"),
    FieldSpec::fixed("reserved", 11),
    FieldSpec::fixed("fhandle", 4),
    DLEN,
    FieldSpec::dlen_sized("path"),
];

/// `kXR_statx` carries a newline-separated path list.
pub const STATX_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("reserved", 16),
    DLEN,
    FieldSpec::dlen_sized("paths"),
];

pub const SYNC_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("fhandle", 4),
    FieldSpec::fixed("reserved", 12),
    DLEN,
];

pub const TRUNCATE_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("fhandle", 4),
    FieldSpec::i64("size"),
    FieldSpec::fixed("reserved", 4),
    DLEN,
    FieldSpec::dlen_sized("path"),
];

pub const WRITE_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("fhandle", 4),
    FieldSpec::i64("offset"),
    FieldSpec::fixed("pathid", 1),
    FieldSpec::fixed("reserved", 3),
    DLEN,
    FieldSpec::dlen_sized("data"),
];

pub const VERIFYW_REQUEST: &[FieldSpec] = &[
    FieldSpec::fixed("fhandle", 4),
    FieldSpec::i64("offset"),
    FieldSpec::fixed("pathid", 1),
    FieldSpec::fixed("vertype", 1),
    FieldSpec::fixed("reserved", 2),
    DLEN,
    FieldSpec::dlen_sized("data"),
];

pub const BIND_RESPONSE: &[FieldSpec] = &[FieldSpec::fixed("pathid", 1)];

/// `cpsize`, `cptype` and `data` are optional, see the open filtering rule.
pub const OPEN_RESPONSE: &[FieldSpec] = &[
    FieldSpec::fixed("fhandle", 4),
    FieldSpec::i32("cpsize"),
    FieldSpec::fixed("cptype", 4),
    FieldSpec::dlen_sized_minus("data", 12).frozen(),
];

pub const PROTOCOL_RESPONSE: &[FieldSpec] =
    &[FieldSpec::i32("pval"), FieldSpec::i32("flags").frozen()];

pub const LOGIN_RESPONSE: &[FieldSpec] = &[
    FieldSpec::fixed("sessid", 16),
    FieldSpec::dlen_sized_minus("sec", 16).frozen(),
];

pub const REDIRECT_RESPONSE: &[FieldSpec] = &[
    FieldSpec::i32("port"),
    FieldSpec::dlen_sized_minus("host", 4).frozen(),
];

pub const ERROR_RESPONSE: &[FieldSpec] = &[
    FieldSpec::i32("errnum"),
    FieldSpec::dlen_sized_minus("errmsg", 4).frozen(),
];

pub const WAIT_RESPONSE: &[FieldSpec] = &[
    FieldSpec::i32("seconds"),
    FieldSpec::dlen_sized_minus("infomsg", 4).frozen(),
];

pub const WAITRESP_RESPONSE: &[FieldSpec] = &[FieldSpec::i32("seconds")];

pub const AUTHMORE_RESPONSE: &[FieldSpec] = &[FieldSpec::dlen_sized("data").frozen()];

/// Body shared by every buffer-style response (`kXR_read`, `kXR_stat`, ...).
pub const BUFFER_RESPONSE: &[FieldSpec] = &[FieldSpec::dlen_sized("data").frozen()];

pub const ATTN_RESPONSE: &[FieldSpec] = &[
    FieldSpec::i32("actnum"),
    FieldSpec::dlen_sized_minus("parms", 4).frozen(),
];

pub const ATTN_ASYNCRD_RESPONSE: &[FieldSpec] = &[
    FieldSpec::i32("actnum"),
    FieldSpec::i32("port"),
    FieldSpec::dlen_sized_minus("host", 8).frozen(),
];

pub const ATTN_ASYNRESP_RESPONSE: &[FieldSpec] = &[
    FieldSpec::i32("actnum"),
    FieldSpec::fixed("reserved", 4),
    FieldSpec::u16("rsid"),
    FieldSpec::u16("rstatus"),
    FieldSpec::i32("rlen"),
    FieldSpec::dlen_sized_minus("rdata", 16).frozen(),
];

pub const ATTN_ASYNCWT_RESPONSE: &[FieldSpec] =
    &[FieldSpec::i32("actnum"), FieldSpec::i32("wsec")];

pub const ATTN_ASYNCDI_RESPONSE: &[FieldSpec] = &[
    FieldSpec::i32("actnum"),
    FieldSpec::i32("wsec"),
    FieldSpec::i32("msec"),
];
