//! Fuzz the whole driver.
//!
//! An arbitrary template rendered against a fixed argument pool must never
//! panic, never overrun the capped buffer, and — when the call succeeds —
//! report a count equal to the bytes a stream sink receives.

#![no_main]
use libfuzzer_sys::fuzz_target;
use printf_rs_core::{fprintf, snprintf, Arg};

fuzz_target!(|data: &[u8]| {
    let cell = std::cell::Cell::new(0i64);
    let args = [
        Arg::Int(-12345),
        Arg::Uint(u64::MAX),
        Arg::Str(Some(b"fuzz\0tail")),
        Arg::Ptr(0xdead_beef),
        Arg::Int(65),
        Arg::Count(Some(&cell)),
        Arg::Float(2.5),
        Arg::Int(7),
    ];

    let mut out = Vec::new();
    let stream_ret = fprintf(&mut out, data, &args);
    if stream_ret >= 0 {
        assert_eq!(out.len() as i32, stream_ret);
    } else {
        assert_eq!(stream_ret, -1);
    }

    let mut buf = [0u8; 64];
    let capped_ret = snprintf(&mut buf, 16, data, &args);
    if capped_ret >= 0 && stream_ret >= 0 {
        // The cap changes storage, never the count.
        assert_eq!(capped_ret, stream_ret);
        let stored = (capped_ret as usize).min(15);
        assert_eq!(buf[stored], 0);
        // Bytes past the cap stay untouched.
        assert!(buf[16..].iter().all(|&b| b == 0));
    }
});
