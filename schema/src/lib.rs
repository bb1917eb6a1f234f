//! Message layouts, protocol codes and the schema registry for xrdsim.
//!
//! This crate defines what every protocol message looks like on the wire:
//! - Field specifications (integer widths, fixed and variable byte blocks)
//! - Message schemas and their validation rules
//! - Closed code tables for requests, statuses, actions and errors
//! - Option bitmasks and protocol constants
//! - The registry that serves full message layouts by name
//!
//! # Design Principles
//!
//! - **Declarative layouts** - Messages are ordered field lists, not hand-written structs.
//! - **Strict mappings** - Unknown codes and names are errors, never defaults.
//! - **Built once** - The registry is immutable after construction and shared by reference.

mod codes;
mod error;
mod field;
pub mod layouts;
mod options;
mod registry;
mod schema;

pub use codes::{ActionCode, ErrorCode, RequestKind, ResponseStatus};
pub use error::{CodeTable, SchemaError, SchemaResult};
pub use field::{FieldSpec, LengthSource, WireType};
pub use options::{
    LoginCapability, MkdirOptions, OpenMode, OpenOptions, PrepareOptions, QueryType,
    ServerFlags, StatOptions, DATA_SERVER, LOAD_BALANCING_SERVER, ROLE_ADMIN, ROLE_USER,
};
pub use registry::{
    attn_schema_name, ok_response_schema_name, request_schema_name, status_schema_name,
    Registry, CLIENT_HANDSHAKE_SCHEMA, READ_LIST_SCHEMA, REQUEST_HEADER_SCHEMA,
    RESPONSE_HEADER_SCHEMA, SERVER_HANDSHAKE_SCHEMA,
};
pub use schema::MessageSchema;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = FieldSpec::u16("streamid");
        let _ = WireType::Variable(LengthSource::Remaining);
        let _ = RequestKind::Login;
        let _ = ResponseStatus::Ok;
        let _ = ActionCode::AsyncRd;
        let _ = ErrorCode::NotFound;
        let _ = OpenOptions::default();
        let _ = Registry::shared();

        let _: SchemaResult<()> = Ok(());
    }

    #[test]
    fn registry_resolves_every_request_by_code() {
        let registry = Registry::shared();
        for &kind in RequestKind::ALL {
            let name = registry.request_name_for(kind.code()).unwrap();
            let schema = registry
                .request_schema(RequestKind::from_name(name).unwrap())
                .unwrap();
            assert!(schema.contains("streamid") || schema.contains("fifth"));
        }
    }
}
