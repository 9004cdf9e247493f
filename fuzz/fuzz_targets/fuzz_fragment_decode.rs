#![no_main]

use anchorscroll_core::TargetId;
use anchorscroll_core::fragment::decode_fragment;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    let id = TargetId::resolve(raw);
    assert_eq!(id.raw, raw);
    match decode_fragment(raw) {
        Ok(decoded) => {
            assert!(!id.fell_back_to_raw());
            assert_eq!(id.lookup_key(), decoded);
            // Decoding never grows the input.
            assert!(decoded.len() <= raw.len());
        }
        Err(_) => {
            assert!(id.fell_back_to_raw());
            assert_eq!(id.lookup_key(), raw);
        }
    }
});
