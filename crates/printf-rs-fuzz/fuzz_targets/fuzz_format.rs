//! Fuzz the directive parser.
//!
//! Arbitrary bytes after a '%' must either parse into a specifier whose
//! recorded input length is in bounds, or fail with a fatal diagnostic —
//! never panic.

#![no_main]
use libfuzzer_sys::fuzz_target;
use printf_rs_core::parse_specifier;

fuzz_target!(|data: &[u8]| {
    match parse_specifier(data) {
        Ok(parsed) => {
            assert!(parsed.spec.input_length <= data.len());
            assert!(parsed.spec.input_length > 0);
            assert!(!parsed.warning.is_error());
            // The reconstructed directive must itself parse.
            let text = parsed.spec.to_string();
            let reparsed = parse_specifier(&text.as_bytes()[1..])
                .expect("reconstructed directive parses");
            assert_eq!(reparsed.spec.conversion, parsed.spec.conversion);
        }
        Err(diag) => assert!(diag.is_error()),
    }
});
