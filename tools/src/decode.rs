//! Decoding of captured message bytes.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use codec::{Codec, MessageRecord, Value};
use glob::Pattern;
use serde::Serialize;

/// How to interpret captured bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DecodeAs {
    Request,
    Response,
}

/// Every message decoded from one capture.
#[derive(Debug, Serialize)]
pub struct DecodeOutput {
    pub messages: Vec<MessageRecord>,
}

/// Decodes all messages in `bytes`.
///
/// Responses need the originating request, passed as its encoded bytes.
pub fn decode_messages(
    codec: &Codec<'_>,
    bytes: &[u8],
    kind: DecodeAs,
    request: Option<&[u8]>,
) -> Result<DecodeOutput> {
    let messages = match kind {
        DecodeAs::Request => codec.decode_requests(bytes).context("decode requests")?,
        DecodeAs::Response => {
            let Some(request) = request else {
                bail!("decoding a response needs the originating request (--request)");
            };
            let request = codec
                .decode_request(request)
                .context("decode originating request")?
                .record;
            decode_responses(codec, bytes, &request)?
        }
    };
    Ok(DecodeOutput { messages })
}

fn decode_responses(
    codec: &Codec<'_>,
    bytes: &[u8],
    request: &MessageRecord,
) -> Result<Vec<MessageRecord>> {
    let max_messages = codec.limits().max_messages;
    let mut records = Vec::new();
    let mut rest = bytes;
    while !rest.is_empty() {
        if records.len() == max_messages {
            bail!("more than {max_messages} responses in one capture");
        }
        let decoded = codec
            .decode_response(rest, request)
            .with_context(|| format!("decode response {}", records.len()))?;
        rest = &rest[decoded.consumed..];
        records.push(decoded.record);
    }
    Ok(records)
}

/// Renders decoded messages one field per line, in layout order.
pub fn format_decode_pretty(output: &DecodeOutput) -> String {
    let mut out = String::new();
    for (index, record) in output.messages.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        format_record(&mut out, record, 0);
    }
    out
}

fn format_record(out: &mut String, record: &MessageRecord, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(
        out,
        "{indent}{} ({}) streamid: {}",
        record.type_name(),
        record.schema.name,
        record.streamid()
    );
    for field in &record.schema.fields {
        let Some(value) = record.get(field.name) else {
            continue;
        };
        let _ = writeln!(out, "{indent}  {}: {}", field.name, format_value(value));
    }
    if let Some(nested) = &record.nested {
        let _ = writeln!(out, "{indent}  embedded:");
        format_record(out, nested, depth + 2);
    }
}

/// Integers print in decimal; byte blocks print as text when they are
/// printable (ignoring trailing NULs) and as hex otherwise.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::U8(v) => v.to_string(),
        Value::U16(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::Bytes(bytes) => {
            let trimmed = trim_nuls(bytes);
            if !trimmed.is_empty() && trimmed.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
                format!("{:?} ({} bytes)", String::from_utf8_lossy(trimmed), bytes.len())
            } else {
                let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
                format!("0x{hex} ({} bytes)", bytes.len())
            }
        }
    }
}

fn trim_nuls(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |pos| pos + 1);
    &bytes[..end]
}

/// A capture file found in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// Lists the files of `dir`, keeping those whose path or file name matches
/// `glob`, sorted by path.
pub fn collect_message_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<MessageEntry>> {
    let pattern = glob
        .map(|value| Pattern::new(value).context("invalid glob pattern"))
        .transpose()?;

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(MessageEntry { path, size });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}
