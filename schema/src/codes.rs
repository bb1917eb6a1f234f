//! Protocol code tables.
//!
//! Each table is a closed enum with a strict bidirectional mapping between
//! its wire code and its symbolic `kXR_*` name. Unknown codes and names are
//! hard errors.

use crate::error::{CodeTable, SchemaError, SchemaResult};

macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $vis:vis enum $ty:ident: $repr:ty => $table:path {
            $($variant:ident = $code:literal => $name:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        $vis enum $ty {
            $($variant,)+
        }

        impl $ty {
            /// Every entry of the table, in code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Returns the wire code.
            #[must_use]
            pub const fn code(self) -> $repr {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Returns the symbolic name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Maps a wire code to its entry.
            pub fn from_code(code: $repr) -> SchemaResult<Self> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(SchemaError::UnknownCode {
                        table: $table,
                        code: i64::from(code),
                    }),
                }
            }

            /// Maps a symbolic name to its entry.
            pub fn from_name(name: &str) -> SchemaResult<Self> {
                match name {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(SchemaError::UnknownName {
                        table: $table,
                        name: name.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

code_table! {
    /// Request codes carried in the second header field.
    pub enum RequestKind: u16 => CodeTable::Request {
        Handshake = 0 => "handshake",
        Auth = 3000 => "kXR_auth",
        Query = 3001 => "kXR_query",
        Chmod = 3002 => "kXR_chmod",
        Close = 3003 => "kXR_close",
        Dirlist = 3004 => "kXR_dirlist",
        Getfile = 3005 => "kXR_getfile",
        Protocol = 3006 => "kXR_protocol",
        Login = 3007 => "kXR_login",
        Mkdir = 3008 => "kXR_mkdir",
        Mv = 3009 => "kXR_mv",
        Open = 3010 => "kXR_open",
        Ping = 3011 => "kXR_ping",
        Putfile = 3012 => "kXR_putfile",
        Read = 3013 => "kXR_read",
        Rm = 3014 => "kXR_rm",
        Rmdir = 3015 => "kXR_rmdir",
        Sync = 3016 => "kXR_sync",
        Stat = 3017 => "kXR_stat",
        Set = 3018 => "kXR_set",
        Write = 3019 => "kXR_write",
        Admin = 3020 => "kXR_admin",
        Prepare = 3021 => "kXR_prepare",
        Statx = 3022 => "kXR_statx",
        Endsess = 3023 => "kXR_endsess",
        Bind = 3024 => "kXR_bind",
        Readv = 3025 => "kXR_readv",
        Verifyw = 3026 => "kXR_verifyw",
        Locate = 3027 => "kXR_locate",
        Truncate = 3028 => "kXR_truncate",
    }
}

code_table! {
    /// Response status codes carried in the second response header field.
    pub enum ResponseStatus: u16 => CodeTable::Status {
        Ok = 0 => "kXR_ok",
        OkSoFar = 4000 => "kXR_oksofar",
        Attn = 4001 => "kXR_attn",
        AuthMore = 4002 => "kXR_authmore",
        Error = 4003 => "kXR_error",
        Redirect = 4004 => "kXR_redirect",
        Wait = 4005 => "kXR_wait",
        WaitResp = 4006 => "kXR_waitresp",
        NoResponsesYet = 10000 => "kXR_noResponsesYet",
    }
}

code_table! {
    /// Action codes carried in the first word of an attention body.
    pub enum ActionCode: i32 => CodeTable::Action {
        AsyncAb = 5000 => "kXR_asyncab",
        AsyncDi = 5001 => "kXR_asyncdi",
        AsyncMs = 5002 => "kXR_asyncms",
        AsyncRd = 5003 => "kXR_asyncrd",
        AsyncWt = 5004 => "kXR_asyncwt",
        AsyncAv = 5005 => "kXR_asyncav",
        AsynUnav = 5006 => "kXR_asynunav",
        AsyncGo = 5007 => "kXR_asyncgo",
        AsynResp = 5008 => "kXR_asynresp",
    }
}

code_table! {
    /// Error numbers carried in `kXR_error` bodies.
    pub enum ErrorCode: i32 => CodeTable::Error {
        ArgInvalid = 3000 => "kXR_ArgInvalid",
        ArgMissing = 3001 => "kXR_ArgMissing",
        ArgTooLong = 3002 => "kXR_ArgTooLong",
        FileLocked = 3003 => "kXR_FileLocked",
        FileNotOpen = 3004 => "kXR_FileNotOpen",
        FsError = 3005 => "kXR_FSError",
        InvalidRequest = 3006 => "kXR_InvalidRequest",
        IoError = 3007 => "kXR_IOError",
        NoMemory = 3008 => "kXR_NoMemory",
        NoSpace = 3009 => "kXR_NoSpace",
        NotAuthorized = 3010 => "kXR_NotAuthorized",
        NotFound = 3011 => "kXR_NotFound",
        ServerError = 3012 => "kXR_ServerError",
        Unsupported = 3013 => "kXR_Unsupported",
        NoServer = 3014 => "kXR_noserver",
        NotFile = 3015 => "kXR_NotFile",
        IsDirectory = 3016 => "kXR_isDirectory",
        Cancelled = 3017 => "kXR_Cancelled",
        ChkLenErr = 3018 => "kXR_ChkLenErr",
        ChkSumErr = 3019 => "kXR_ChkSumErr",
        InProgress = 3020 => "kXR_inProgress",
        NoErrorYet = 10000 => "kXR_noErrorYet",
    }
}

impl RequestKind {
    /// Returns the lowercase name used for schema names (`login`, `readv`, ...).
    #[must_use]
    pub fn short_name(self) -> &'static str {
        let name = self.name();
        name.strip_prefix("kXR_").unwrap_or(name)
    }
}

impl ResponseStatus {
    /// Returns the lowercase name used for schema names (`error`, `authmore`, ...).
    #[must_use]
    pub fn short_name(self) -> &'static str {
        let name = self.name();
        name.strip_prefix("kXR_").unwrap_or(name)
    }
}

impl ActionCode {
    /// Returns the lowercase name used for schema names (`asyncrd`, ...).
    #[must_use]
    pub fn short_name(self) -> &'static str {
        let name = self.name();
        name.strip_prefix("kXR_").unwrap_or(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_codes_match_protocol() {
        assert_eq!(RequestKind::Handshake.code(), 0);
        assert_eq!(RequestKind::Login.code(), 3007);
        assert_eq!(RequestKind::Truncate.code(), 3028);
        assert_eq!(RequestKind::ALL.len(), 30);
    }

    #[test]
    fn request_lookup_both_ways() {
        assert_eq!(RequestKind::from_code(3017).unwrap(), RequestKind::Stat);
        assert_eq!(RequestKind::from_name("kXR_ping").unwrap(), RequestKind::Ping);
        assert_eq!(RequestKind::Stat.name(), "kXR_stat");
    }

    #[test]
    fn unknown_request_code_is_error() {
        let err = RequestKind::from_code(2999).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownCode {
                table: CodeTable::Request,
                code: 2999
            }
        ));
    }

    #[test]
    fn unknown_status_name_is_error() {
        let err = ResponseStatus::from_name("kXR_maybe").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownName {
                table: CodeTable::Status,
                ..
            }
        ));
    }

    #[test]
    fn short_names() {
        assert_eq!(RequestKind::Login.short_name(), "login");
        assert_eq!(RequestKind::Handshake.short_name(), "handshake");
        assert_eq!(ResponseStatus::AuthMore.short_name(), "authmore");
        assert_eq!(ActionCode::AsynResp.short_name(), "asynresp");
    }

    #[test]
    fn status_and_action_codes() {
        assert_eq!(ResponseStatus::Attn.code(), 4001);
        assert_eq!(ResponseStatus::NoResponsesYet.code(), 10000);
        assert_eq!(ActionCode::AsyncRd.code(), 5003);
        assert_eq!(ErrorCode::from_code(3011).unwrap(), ErrorCode::NotFound);
        assert_eq!(ErrorCode::NoErrorYet.name(), "kXR_noErrorYet");
    }

    #[test]
    fn display_uses_protocol_name() {
        assert_eq!(ActionCode::AsyncWt.to_string(), "kXR_asyncwt");
    }
}
