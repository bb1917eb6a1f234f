use codec::{Codec, CodecError, MessageBuilder, MessageRecord};
use schema::{OpenOptions, Registry, RequestKind, ResponseStatus};

fn open_request(options: u16) -> MessageRecord {
    MessageBuilder::request(Registry::shared(), RequestKind::Open)
        .unwrap()
        .set("streamid", 2u16)
        .set("options", options)
        .set("path", "/data/file")
        .build()
        .unwrap()
}

fn open_response(body: &[u8]) -> Vec<u8> {
    let mut raw = vec![0, 2, 0, 0];
    raw.extend_from_slice(&i32::try_from(body.len()).unwrap().to_be_bytes());
    raw.extend_from_slice(body);
    raw
}

fn decode(options: u16, body: &[u8]) -> Result<MessageRecord, CodecError> {
    Codec::new(Registry::shared())
        .decode_response(&open_response(body), &open_request(options))
        .map(|decoded| decoded.record)
}

#[test]
fn plain_open_returns_only_handle() {
    let record = decode(0, &[0, 0, 0, 1]).unwrap();
    assert_eq!(record.bytes("fhandle").unwrap(), &[0, 0, 0, 1]);
    assert!(record.get("cpsize").is_none());
    assert!(record.get("data").is_none());
}

#[test]
fn retstat_returns_compression_and_stat() {
    let mut body = vec![0, 0, 0, 1];
    body.extend_from_slice(&0i32.to_be_bytes());
    body.extend_from_slice(&[0; 4]);
    body.extend_from_slice(b"1 1024 0 0");
    let record = decode(OpenOptions::RETSTAT, &body).unwrap();
    assert_eq!(record.i32("cpsize").unwrap(), 0);
    assert_eq!(record.bytes("data").unwrap(), b"1 1024 0 0");
}

#[test]
fn compress_with_info_keeps_cpsize() {
    let mut body = vec![0, 0, 0, 1];
    body.extend_from_slice(&512i32.to_be_bytes());
    body.extend_from_slice(b"zlib");
    let record = decode(OpenOptions::COMPRESS, &body).unwrap();
    assert_eq!(record.i32("cpsize").unwrap(), 512);
    assert_eq!(record.bytes("cptype").unwrap(), b"zlib");
    assert!(record.get("data").is_none());
}

#[test]
fn compress_without_info_keeps_only_handle() {
    let record = decode(OpenOptions::COMPRESS, &[0, 0, 0, 1]).unwrap();
    assert!(record.get("cpsize").is_none());
}

#[test]
fn open_without_options_rejects_extra_body() {
    let err = decode(0, &[0; 12]).unwrap_err();
    assert!(matches!(err, CodecError::TrailingData { .. }));
}

#[test]
fn built_open_response_decodes_back() {
    let schema = codec::open_response_schema(
        Registry::shared()
            .ok_response_schema(RequestKind::Open)
            .unwrap(),
        OpenOptions::default(),
        4,
    );
    let raw = MessageBuilder::response(schema, ResponseStatus::Ok, 2)
        .set("fhandle", [0u8, 0, 0, 7])
        .encode()
        .unwrap();
    let record = Codec::new(Registry::shared())
        .decode_response(&raw, &open_request(0))
        .unwrap()
        .record;
    assert_eq!(record.bytes("fhandle").unwrap(), &[0, 0, 0, 7]);
}

#[test]
fn open_request_without_options_is_an_error() {
    let mut request = open_request(OpenOptions::RETSTAT);
    request.values.remove("options");
    let err = Codec::new(Registry::shared())
        .decode_response(&open_response(&[0, 0, 0, 1]), &request)
        .unwrap_err();
    assert!(matches!(
        err,
        CodecError::MissingValue { ref field, .. } if field == "options"
    ));
}
