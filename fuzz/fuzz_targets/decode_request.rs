#![no_main]

use codec::Codec;
use libfuzzer_sys::fuzz_target;
use schema::Registry;

fuzz_target!(|data: &[u8]| {
    let limits = wire::Limits::for_testing();
    let codec = Codec::with_limits(Registry::shared(), limits.clone());

    let _ = wire::request_frame_len(data, &limits);
    let _ = wire::split_requests(data, &limits);

    if let Ok(decoded) = codec.decode_request(data) {
        assert!(decoded.consumed <= data.len());
        // A decoded request re-encodes to the bytes it was read from.
        let encoded = codec::encode_record(&decoded.record).expect("re-encode decoded request");
        assert_eq!(&encoded[..], &data[..decoded.consumed]);
    }
    let _ = codec.decode_requests(data);
});
