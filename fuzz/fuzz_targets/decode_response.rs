#![no_main]

use codec::{Codec, MessageBuilder};
use libfuzzer_sys::fuzz_target;
use schema::{Registry, RequestKind};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    if rest.len() < 2 {
        return;
    }
    let (options, raw) = rest.split_at(2);

    let registry = Registry::shared();
    let kind = RequestKind::ALL[usize::from(selector) % RequestKind::ALL.len()];
    let Ok(mut builder) = MessageBuilder::request(registry, kind) else {
        return;
    };
    if kind == RequestKind::Open {
        builder = builder.set("options", u16::from_be_bytes([options[0], options[1]]));
    }
    let Ok(request) = builder.build() else {
        return;
    };

    let limits = wire::Limits::for_testing();
    let codec = Codec::with_limits(registry, limits.clone());
    let _ = wire::response_frame_len(raw, &limits);
    if let Ok(decoded) = codec.decode_response(raw, &request) {
        assert!(decoded.consumed <= raw.len());
    }
});
