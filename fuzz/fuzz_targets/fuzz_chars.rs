#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlsmith::util::chars::{fix_char, fix_name, utf16, validate_char, validate_name};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Fixed output always validates, and valid input is left alone
        let fixed = fix_char(s);
        assert!(validate_char(&fixed));
        if validate_char(s) {
            assert_eq!(fixed, s);
        }
        let fixed = fix_name(s);
        assert!(s.is_empty() || validate_name(&fixed));
        if validate_name(s) {
            assert_eq!(fixed, s);
        }
    }

    // Same duality over raw UTF-16, including lone surrogates
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    assert!(validate_char(&utf16::fix_char(&units)));
    let fixed = utf16::fix_name(&units);
    assert!(units.is_empty() || validate_name(&fixed));
});
