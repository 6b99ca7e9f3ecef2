#![no_main]

use bactag_core::Envelope;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(envelopes) = Envelope::parse_all(data) else {
        return;
    };
    // Every decoded stream re-encodes to exactly the input.
    let mut out = Vec::with_capacity(data.len());
    for env in &envelopes {
        out.extend(env.to_vec().expect("decoded envelope must re-encode"));
    }
    assert_eq!(out, data);
});
