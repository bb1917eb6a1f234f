//! Attention (`kXR_attn`) body selection.

use schema::{ActionCode, MessageSchema, Registry, ResponseStatus};

use crate::error::{CodecError, CodecResult};

/// Byte offset of the action code within an attention message.
pub(crate) const ACTNUM_OFFSET: usize = wire::RESPONSE_HEADER_SIZE;

/// Byte offset of the embedded response within a `kXR_asynresp` message.
///
/// The embedded response header starts after the action code and 4 reserved bytes.
pub(crate) const EMBEDDED_RESPONSE_OFFSET: usize = wire::RESPONSE_HEADER_SIZE + 8;

/// Reads the action code of an attention message.
pub fn action_code(frame: &[u8]) -> CodecResult<ActionCode> {
    let bytes = frame
        .get(ACTNUM_OFFSET..ACTNUM_OFFSET + 4)
        .ok_or_else(|| CodecError::Truncated {
            schema: "attn_response".to_string(),
            field: "actnum".to_string(),
            offset: ACTNUM_OFFSET,
            expected: 4,
            actual: frame.len().saturating_sub(ACTNUM_OFFSET),
        })?;
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    Ok(ActionCode::from_code(i32::from_be_bytes(word))?)
}

/// Chooses the layout for an attention message with `action`.
///
/// Redirects, waits, disconnects and wrapped responses have dedicated bodies;
/// every other action uses the generic `actnum` + `parms` body.
pub fn attn_schema(registry: &Registry, action: ActionCode) -> CodecResult<&MessageSchema> {
    if let Some(schema) = registry.attn_schema(action) {
        return Ok(schema);
    }
    registry
        .status_schema(ResponseStatus::Attn)
        .ok_or_else(|| {
            CodecError::Schema(schema::SchemaError::UnknownSchema {
                name: schema::status_schema_name(ResponseStatus::Attn),
            })
        })
}
