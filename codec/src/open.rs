//! Conditional fields of `kXR_open` responses.

use schema::{MessageSchema, OpenOptions};

/// Size of the file handle that every open response starts with.
const FHANDLE_LEN: usize = 4;

/// Fields whose presence depends on the request's options.
const OPTIONAL_FIELDS: [&str; 3] = ["cpsize", "cptype", "data"];

/// Returns the open response layout for a request sent with `options`.
///
/// With `kXR_retstat` the compression info and stat data are present. With
/// only `kXR_compress` the compression info is present when the body is
/// longer than the file handle, and stat data is absent. Otherwise only the
/// file handle remains.
#[must_use]
pub fn open_response_schema(
    base: &MessageSchema,
    options: OpenOptions,
    body_len: usize,
) -> MessageSchema {
    if options.retstat() {
        return base.clone();
    }
    if options.compress() {
        if body_len > FHANDLE_LEN {
            return base.without(&["data"]);
        }
        return base.without(&OPTIONAL_FIELDS);
    }
    base.without(&OPTIONAL_FIELDS)
}
