//! The schema registry.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::codes::{ActionCode, ErrorCode, RequestKind, ResponseStatus};
use crate::error::{SchemaError, SchemaResult};
use crate::field::FieldSpec;
use crate::layouts as l;
use crate::schema::MessageSchema;

pub const REQUEST_HEADER_SCHEMA: &str = "request_header";
pub const RESPONSE_HEADER_SCHEMA: &str = "response_header";
pub const CLIENT_HANDSHAKE_SCHEMA: &str = "client_handshake";
pub const SERVER_HANDSHAKE_SCHEMA: &str = "server_handshake";
pub const READ_LIST_SCHEMA: &str = "read_list";

/// Name of the full schema for a request.
#[must_use]
pub fn request_schema_name(kind: RequestKind) -> String {
    match kind {
        RequestKind::Handshake => CLIENT_HANDSHAKE_SCHEMA.to_string(),
        other => format!("{}_request", other.short_name()),
    }
}

/// Name of the full schema for a `kXR_ok` answer to a request.
#[must_use]
pub fn ok_response_schema_name(kind: RequestKind) -> String {
    match kind {
        RequestKind::Handshake => SERVER_HANDSHAKE_SCHEMA.to_string(),
        other => format!("{}_response", other.short_name()),
    }
}

/// Name of the full schema for a non-ok status.
#[must_use]
pub fn status_schema_name(status: ResponseStatus) -> String {
    format!("{}_response", status.short_name())
}

/// Name of the full schema for an attention response with a dedicated body.
#[must_use]
pub fn attn_schema_name(action: ActionCode) -> String {
    format!("attn_{}_response", action.short_name())
}

/// Immutable table of every message layout, keyed by schema name.
///
/// Construct once and share by reference; [`Registry::shared`] provides a
/// process-wide instance.
#[derive(Debug, Clone)]
pub struct Registry {
    schemas: BTreeMap<String, MessageSchema>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Builds the registry with every protocol layout.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            schemas: BTreeMap::new(),
        };

        registry.insert(REQUEST_HEADER_SCHEMA, &[l::REQUEST_HEADER]);
        registry.insert(RESPONSE_HEADER_SCHEMA, &[l::RESPONSE_HEADER]);
        registry.insert(CLIENT_HANDSHAKE_SCHEMA, &[l::CLIENT_HANDSHAKE]);
        registry.insert(
            SERVER_HANDSHAKE_SCHEMA,
            &[l::RESPONSE_HEADER, l::SERVER_HANDSHAKE_BODY],
        );
        registry.insert(READ_LIST_SCHEMA, &[l::READ_LIST]);

        for &kind in RequestKind::ALL {
            if let Some(body) = request_body(kind) {
                registry.insert(&request_schema_name(kind), &[l::REQUEST_HEADER, body]);
            }
            if let Some(body) = ok_response_body(kind) {
                registry.insert(&ok_response_schema_name(kind), &[l::RESPONSE_HEADER, body]);
            }
        }
        for &status in ResponseStatus::ALL {
            if let Some(body) = status_body(status) {
                registry.insert(&status_schema_name(status), &[l::RESPONSE_HEADER, body]);
            }
        }
        for &action in ActionCode::ALL {
            if let Some(body) = attn_body(action) {
                registry.insert(&attn_schema_name(action), &[l::RESPONSE_HEADER, body]);
            }
        }
        registry
    }

    /// Returns the process-wide registry.
    pub fn shared() -> &'static Self {
        static SHARED: OnceLock<Registry> = OnceLock::new();
        SHARED.get_or_init(Self::new)
    }

    fn insert(&mut self, name: &str, parts: &[&[FieldSpec]]) {
        let fields = parts.iter().flat_map(|part| part.iter().copied()).collect();
        self.schemas.insert(
            name.to_string(),
            MessageSchema {
                name: name.to_string(),
                fields,
            },
        );
    }

    /// Validates every registered schema.
    pub fn validate(&self) -> SchemaResult<()> {
        self.schemas.values().try_for_each(MessageSchema::validate)
    }

    /// Looks up a schema by name.
    pub fn schema_for(&self, name: &str) -> SchemaResult<&MessageSchema> {
        self.schemas
            .get(name)
            .ok_or_else(|| SchemaError::UnknownSchema {
                name: name.to_string(),
            })
    }

    /// Iterates over every schema in name order.
    pub fn schemas(&self) -> impl Iterator<Item = &MessageSchema> {
        self.schemas.values()
    }

    /// Returns the full schema of a request (handshake included).
    pub fn request_schema(&self, kind: RequestKind) -> SchemaResult<&MessageSchema> {
        self.schema_for(&request_schema_name(kind))
    }

    /// Returns the `kXR_ok` schema for a request, if it has a body.
    #[must_use]
    pub fn ok_response_schema(&self, kind: RequestKind) -> Option<&MessageSchema> {
        self.schemas.get(&ok_response_schema_name(kind))
    }

    /// Returns the schema for a non-ok status, if it has a body.
    #[must_use]
    pub fn status_schema(&self, status: ResponseStatus) -> Option<&MessageSchema> {
        self.schemas.get(&status_schema_name(status))
    }

    /// Returns the dedicated attention schema for an action, if any.
    #[must_use]
    pub fn attn_schema(&self, action: ActionCode) -> Option<&MessageSchema> {
        self.schemas.get(&attn_schema_name(action))
    }

    pub fn request_name_for(&self, code: u16) -> SchemaResult<&'static str> {
        RequestKind::from_code(code).map(RequestKind::name)
    }

    pub fn request_code_for(&self, name: &str) -> SchemaResult<u16> {
        RequestKind::from_name(name).map(RequestKind::code)
    }

    pub fn status_name_for(&self, code: u16) -> SchemaResult<&'static str> {
        ResponseStatus::from_code(code).map(ResponseStatus::name)
    }

    pub fn status_code_for(&self, name: &str) -> SchemaResult<u16> {
        ResponseStatus::from_name(name).map(ResponseStatus::code)
    }

    pub fn action_name_for(&self, code: i32) -> SchemaResult<&'static str> {
        ActionCode::from_code(code).map(ActionCode::name)
    }

    pub fn action_code_for(&self, name: &str) -> SchemaResult<i32> {
        ActionCode::from_name(name).map(ActionCode::code)
    }

    pub fn error_name_for(&self, code: i32) -> SchemaResult<&'static str> {
        ErrorCode::from_code(code).map(ErrorCode::name)
    }

    pub fn error_code_for(&self, name: &str) -> SchemaResult<i32> {
        ErrorCode::from_name(name).map(ErrorCode::code)
    }
}

const fn request_body(kind: RequestKind) -> Option<&'static [FieldSpec]> {
    let body = match kind {
        // The handshake is registered whole, not as header + body.
        RequestKind::Handshake => return None,
        RequestKind::Admin => l::ADMIN_REQUEST,
        RequestKind::Auth => l::AUTH_REQUEST,
        RequestKind::Bind => l::BIND_REQUEST,
        RequestKind::Chmod => l::CHMOD_REQUEST,
        RequestKind::Close => l::CLOSE_REQUEST,
        RequestKind::Dirlist => l::DIRLIST_REQUEST,
        RequestKind::Endsess => l::ENDSESS_REQUEST,
        RequestKind::Getfile => l::GETFILE_REQUEST,
        RequestKind::Locate => l::LOCATE_REQUEST,
        RequestKind::Login => l::LOGIN_REQUEST,
        RequestKind::Mkdir => l::MKDIR_REQUEST,
        RequestKind::Mv => l::MV_REQUEST,
        RequestKind::Open => l::OPEN_REQUEST,
        RequestKind::Ping => l::PING_REQUEST,
        RequestKind::Protocol => l::PROTOCOL_REQUEST,
        RequestKind::Prepare => l::PREPARE_REQUEST,
        RequestKind::Putfile => l::PUTFILE_REQUEST,
        RequestKind::Query => l::QUERY_REQUEST,
        RequestKind::Read => l::READ_REQUEST,
        RequestKind::Readv => l::READV_REQUEST,
        RequestKind::Rm => l::RM_REQUEST,
        RequestKind::Rmdir => l::RMDIR_REQUEST,
        RequestKind::Set => l::SET_REQUEST,
        RequestKind::Stat => l::STAT_REQUEST,
        RequestKind::Statx => l::STATX_REQUEST,
        RequestKind::Sync => l::SYNC_REQUEST,
        RequestKind::Truncate => l::TRUNCATE_REQUEST,
        RequestKind::Write => l::WRITE_REQUEST,
        RequestKind::Verifyw => l::VERIFYW_REQUEST,
    };
    Some(body)
}

const fn ok_response_body(kind: RequestKind) -> Option<&'static [FieldSpec]> {
    match kind {
        RequestKind::Handshake => None,
        RequestKind::Bind => Some(l::BIND_RESPONSE),
        RequestKind::Open => Some(l::OPEN_RESPONSE),
        RequestKind::Protocol => Some(l::PROTOCOL_RESPONSE),
        RequestKind::Login => Some(l::LOGIN_RESPONSE),
        RequestKind::Dirlist
        | RequestKind::Locate
        | RequestKind::Prepare
        | RequestKind::Query
        | RequestKind::Read
        | RequestKind::Readv
        | RequestKind::Set
        | RequestKind::Stat
        | RequestKind::Statx => Some(l::BUFFER_RESPONSE),
        _ => None,
    }
}

const fn status_body(status: ResponseStatus) -> Option<&'static [FieldSpec]> {
    match status {
        ResponseStatus::Redirect => Some(l::REDIRECT_RESPONSE),
        ResponseStatus::Error => Some(l::ERROR_RESPONSE),
        ResponseStatus::Wait => Some(l::WAIT_RESPONSE),
        ResponseStatus::WaitResp => Some(l::WAITRESP_RESPONSE),
        ResponseStatus::AuthMore => Some(l::AUTHMORE_RESPONSE),
        ResponseStatus::Attn => Some(l::ATTN_RESPONSE),
        ResponseStatus::Ok | ResponseStatus::OkSoFar | ResponseStatus::NoResponsesYet => None,
    }
}

const fn attn_body(action: ActionCode) -> Option<&'static [FieldSpec]> {
    match action {
        ActionCode::AsyncRd => Some(l::ATTN_ASYNCRD_RESPONSE),
        ActionCode::AsynResp => Some(l::ATTN_ASYNRESP_RESPONSE),
        ActionCode::AsyncWt => Some(l::ATTN_ASYNCWT_RESPONSE),
        ActionCode::AsyncDi => Some(l::ATTN_ASYNCDI_RESPONSE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::WireType;
    use crate::CodeTable;

    #[test]
    fn every_registered_schema_is_valid() {
        Registry::new().validate().unwrap();
    }

    #[test]
    fn every_request_has_a_schema() {
        let registry = Registry::new();
        for &kind in RequestKind::ALL {
            let schema = registry.request_schema(kind).unwrap();
            assert!(!schema.is_empty());
        }
    }

    #[test]
    fn request_schemas_start_with_header() {
        let registry = Registry::new();
        let schema = registry.request_schema(RequestKind::Login).unwrap();
        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(&names[..3], &["streamid", "requestid", "pid"]);
        assert_eq!(schema.name, "login_request");
    }

    #[test]
    fn schema_for_unknown_name_fails() {
        let err = Registry::new().schema_for("teleport_request").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownSchema { .. }));
    }

    #[test]
    fn handshake_schemas() {
        let registry = Registry::new();
        let client = registry.request_schema(RequestKind::Handshake).unwrap();
        assert_eq!(client.fixed_len(), Some(20));
        let server = registry.ok_response_schema(RequestKind::Handshake).unwrap();
        assert_eq!(server.name, SERVER_HANDSHAKE_SCHEMA);
        assert_eq!(server.fixed_len(), Some(16));
    }

    #[test]
    fn ok_bodies_exist_only_where_defined() {
        let registry = Registry::new();
        assert!(registry.ok_response_schema(RequestKind::Stat).is_some());
        assert!(registry.ok_response_schema(RequestKind::Open).is_some());
        assert!(registry.ok_response_schema(RequestKind::Ping).is_none());
        assert!(registry.ok_response_schema(RequestKind::Close).is_none());
    }

    #[test]
    fn status_and_attn_bodies() {
        let registry = Registry::new();
        assert!(registry.status_schema(ResponseStatus::Error).is_some());
        assert!(registry.status_schema(ResponseStatus::OkSoFar).is_none());
        let asyncrd = registry.attn_schema(ActionCode::AsyncRd).unwrap();
        assert_eq!(asyncrd.name, "attn_asyncrd_response");
        assert!(registry.attn_schema(ActionCode::AsyncMs).is_none());
    }

    #[test]
    fn read_list_layout() {
        let registry = Registry::new();
        let schema = registry.schema_for(READ_LIST_SCHEMA).unwrap();
        assert_eq!(schema.field("len").unwrap().wire_type, WireType::I32);
        assert_eq!(schema.fixed_len(), Some(16));
    }

    #[test]
    fn mapping_helpers_are_strict() {
        let registry = Registry::new();
        assert_eq!(registry.request_name_for(3011).unwrap(), "kXR_ping");
        assert_eq!(registry.request_code_for("kXR_ping").unwrap(), 3011);
        assert_eq!(registry.status_code_for("kXR_authmore").unwrap(), 4002);
        assert_eq!(registry.action_name_for(5008).unwrap(), "kXR_asynresp");
        assert_eq!(registry.error_code_for("kXR_NotFound").unwrap(), 3011);
        let err = registry.action_code_for("kXR_asyncxx").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownName {
                table: CodeTable::Action,
                ..
            }
        ));
    }

    #[test]
    fn dlen_is_never_mutable() {
        for schema in Registry::new().schemas() {
            if let Some(field) = schema.field("dlen") {
                assert!(!field.mutable, "{}", schema.name);
            }
        }
    }

    #[test]
    fn shared_registry_is_singleton() {
        assert!(std::ptr::eq(Registry::shared(), Registry::shared()));
    }
}
