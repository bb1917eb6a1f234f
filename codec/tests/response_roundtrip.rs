use codec::{encode_record, Codec, MessageBuilder, MessageRecord, Value};
use proptest::prelude::*;
use schema::{
    ActionCode, MessageSchema, OpenOptions, Registry, RequestKind, ResponseStatus, WireType,
};

/// One registered response layout and the request it answers.
#[derive(Debug, Clone)]
struct Case {
    request: MessageRecord,
    schema: MessageSchema,
    status: ResponseStatus,
    action: Option<ActionCode>,
}

fn request(kind: RequestKind) -> MessageRecord {
    let builder = MessageBuilder::request(Registry::shared(), kind).unwrap();
    let builder = if kind == RequestKind::Open {
        builder.set("options", OpenOptions::RETSTAT)
    } else {
        builder
    };
    builder.build().unwrap()
}

/// Every ok body, every non-ok status body and every attention body except
/// `kXR_asynresp`, whose body wraps a whole response.
fn cases() -> Vec<Case> {
    let registry = Registry::shared();
    let ok = RequestKind::ALL.iter().filter_map(|&kind| {
        registry.ok_response_schema(kind).map(|schema| Case {
            request: request(kind),
            schema: schema.clone(),
            status: ResponseStatus::Ok,
            action: None,
        })
    });
    let statuses = ResponseStatus::ALL
        .iter()
        .filter(|&&status| status != ResponseStatus::Attn)
        .filter_map(|&status| {
            registry.status_schema(status).map(|schema| Case {
                request: request(RequestKind::Ping),
                schema: schema.clone(),
                status,
                action: None,
            })
        });
    let attns = ActionCode::ALL
        .iter()
        .filter(|&&action| action != ActionCode::AsynResp)
        .map(|&action| Case {
            request: request(RequestKind::Ping),
            schema: codec::attn_schema(registry, action).unwrap().clone(),
            status: ResponseStatus::Attn,
            action: Some(action),
        });
    ok.chain(statuses).chain(attns).collect()
}

/// Builds the response with every body field derived from `seed` and `block`.
fn seeded_response(case: &Case, seed: u64, block: &[u8]) -> Vec<u8> {
    let mut builder = MessageBuilder::response(case.schema.clone(), case.status, 3);
    for field in &case.schema.fields {
        if matches!(field.name, "streamid" | "status" | "dlen") {
            continue;
        }
        let value = match field.wire_type {
            WireType::U8 => Value::U8(seed as u8),
            WireType::U16 => Value::U16(seed as u16),
            WireType::I32 => Value::I32(seed as i32),
            WireType::I64 => Value::I64(seed as i64),
            WireType::Fixed(size) => Value::Bytes(codec::padded(block, size)),
            WireType::Variable(_) => Value::Bytes(block.to_vec()),
        };
        builder = builder.set(field.name, value);
    }
    if let Some(action) = case.action {
        builder = builder.set("actnum", action.code());
    }
    builder.encode().unwrap()
}

proptest! {
    #[test]
    fn every_response_reencodes_identically(
        case in prop::sample::select(cases()),
        seed in any::<u64>(),
        block in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let raw = seeded_response(&case, seed, &block);
        let dlen = i32::from_be_bytes([raw[4], raw[5], raw[6], raw[7]]);
        prop_assert_eq!(usize::try_from(dlen).unwrap(), raw.len() - 8);

        let decoded = Codec::new(Registry::shared())
            .decode_response(&raw, &case.request)
            .unwrap();
        prop_assert_eq!(decoded.consumed, raw.len());
        prop_assert_eq!(decoded.record.status(), Some(case.status));
        prop_assert_eq!(decoded.record.streamid(), 3);
        prop_assert_eq!(&decoded.record.schema.name, &case.schema.name);
        prop_assert_eq!(encode_record(&decoded.record).unwrap(), raw);
    }
}

#[test]
fn every_layout_is_covered() {
    let names: Vec<String> = cases().into_iter().map(|case| case.schema.name).collect();
    for name in ["server_handshake", "open_response", "error_response", "attn_response"] {
        assert!(names.iter().any(|found| found == name), "{name} missing");
    }
}
