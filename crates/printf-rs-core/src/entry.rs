//! The printf family entry points.
//!
//! Twelve entries: six sink shapes, each taking the arguments either as a
//! plain slice or as a pre-captured [`ArgList`] handle (the `v` variants,
//! which copy the handle and leave the caller's cursor untouched, as
//! `va_copy` does).
//!
//! Every entry returns the number of characters the call produced — for
//! the size-capped buffer sinks, the number it *would* have produced — or
//! `-1` on any failure: malformed template, argument problems, allocation
//! failure, or sink I/O failure. The count saturates at `i32::MAX`.

use std::io::{self, Write};

use crate::args::{Arg, ArgList};
use crate::driver::format_into;
use crate::sink::OutputSink;

/// Run the driver and collapse the outcome to the C return convention.
fn run(sink: &mut OutputSink<'_>, format: &[u8], args: &ArgList<'_>) -> Option<i32> {
    let mut list = args.clone();
    format_into(sink, format, &mut list).ok()?;
    Some(i32::try_from(sink.characters_written()).unwrap_or(i32::MAX))
}

/// Formatted output to the process standard output stream.
pub fn printf(format: &[u8], args: &[Arg<'_>]) -> i32 {
    vprintf(format, &ArgList::new(args))
}

/// [`printf`] over a pre-captured argument handle.
pub fn vprintf(format: &[u8], args: &ArgList<'_>) -> i32 {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    vfprintf(&mut lock, format, args)
}

/// Formatted output to a byte stream.
pub fn fprintf(stream: &mut dyn Write, format: &[u8], args: &[Arg<'_>]) -> i32 {
    vfprintf(stream, format, &ArgList::new(args))
}

/// [`fprintf`] over a pre-captured argument handle.
pub fn vfprintf(stream: &mut dyn Write, format: &[u8], args: &ArgList<'_>) -> i32 {
    let mut sink = OutputSink::stream(stream);
    match run(&mut sink, format, args) {
        Some(count) => count,
        None => -1,
    }
}

/// Formatted output into a caller buffer, NUL-terminated on success.
///
/// The buffer length bounds the stored output; the returned count is the
/// full formatted length either way.
pub fn sprintf(buf: &mut [u8], format: &[u8], args: &[Arg<'_>]) -> i32 {
    vsprintf(buf, format, &ArgList::new(args))
}

/// [`sprintf`] over a pre-captured argument handle.
pub fn vsprintf(buf: &mut [u8], format: &[u8], args: &ArgList<'_>) -> i32 {
    let limit = buf.len();
    vsnprintf(buf, limit, format, args)
}

/// Formatted output into a caller buffer holding at most `size` characters
/// including the terminator. With `size` 0 nothing is stored, not even the
/// terminator, but the count still accumulates.
pub fn snprintf(buf: &mut [u8], size: usize, format: &[u8], args: &[Arg<'_>]) -> i32 {
    vsnprintf(buf, size, format, &ArgList::new(args))
}

/// [`snprintf`] over a pre-captured argument handle.
pub fn vsnprintf(buf: &mut [u8], size: usize, format: &[u8], args: &ArgList<'_>) -> i32 {
    let mut sink = OutputSink::buffer(buf, size);
    match run(&mut sink, format, args) {
        Some(count) => {
            sink.terminate_buffer();
            count
        }
        None => -1,
    }
}

/// Formatted output into a freshly allocated buffer.
///
/// On success `strp` receives the buffer — `count + 1` bytes, the last a
/// NUL terminator — and the count is returned. On failure `strp` is set to
/// `None` and `-1` is returned.
pub fn asprintf(strp: &mut Option<Vec<u8>>, format: &[u8], args: &[Arg<'_>]) -> i32 {
    vasprintf(strp, format, &ArgList::new(args))
}

/// [`asprintf`] over a pre-captured argument handle.
pub fn vasprintf(strp: &mut Option<Vec<u8>>, format: &[u8], args: &ArgList<'_>) -> i32 {
    let mut sink = OutputSink::allocated();
    let Some(count) = run(&mut sink, format, args) else {
        *strp = None;
        return -1;
    };
    match sink.into_allocated() {
        Ok(Some(buf)) => {
            *strp = Some(buf);
            count
        }
        _ => {
            *strp = None;
            -1
        }
    }
}

/// Formatted output to a raw file descriptor, one `write(2)` per byte.
pub fn dprintf(fd: i32, format: &[u8], args: &[Arg<'_>]) -> i32 {
    vdprintf(fd, format, &ArgList::new(args))
}

/// [`dprintf`] over a pre-captured argument handle.
pub fn vdprintf(fd: i32, format: &[u8], args: &ArgList<'_>) -> i32 {
    let mut sink = OutputSink::fd(fd);
    match run(&mut sink, format, args) {
        Some(count) => count,
        None => -1,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fprintf_to_vec() {
        let mut out = Vec::new();
        let count = fprintf(&mut out, b"%d apples", &[Arg::Int(3)]);
        assert_eq!(count, 9);
        assert_eq!(out, b"3 apples");
    }

    #[test]
    fn test_fprintf_failure_returns_minus_one() {
        let mut out = Vec::new();
        assert_eq!(fprintf(&mut out, b"%q", &[]), -1);
    }

    #[test]
    fn test_sprintf_terminates() {
        let mut buf = [0xAAu8; 16];
        let count = sprintf(&mut buf, b"hi %s", &[Arg::Str(Some(b"there"))]);
        assert_eq!(count, 8);
        assert_eq!(&buf[..9], b"hi there\0");
    }

    #[test]
    fn test_snprintf_caps_and_counts() {
        let mut buf = [0xAAu8; 16];
        let count = snprintf(&mut buf, 4, b"%d", &[Arg::Int(12345)]);
        assert_eq!(count, 5);
        assert_eq!(&buf[..4], b"123\0");
        assert_eq!(buf[4], 0xAA);
    }

    #[test]
    fn test_snprintf_size_zero_stores_nothing() {
        let mut buf = [0xAAu8; 4];
        let count = snprintf(&mut buf, 0, b"abc", &[]);
        assert_eq!(count, 3);
        assert_eq!(buf, [0xAA; 4]);
    }

    #[test]
    fn test_asprintf_transfers_ownership() {
        let mut out = None;
        let count = asprintf(&mut out, b"%s %s", &[Arg::Str(Some(b"ab")), Arg::Str(Some(b"cd"))]);
        assert_eq!(count, 5);
        let buf = out.expect("allocated buffer");
        assert_eq!(buf.len(), 6);
        assert_eq!(&buf[..5], b"ab cd");
        assert_eq!(buf[5], 0);
    }

    #[test]
    fn test_asprintf_failure_nulls_out_parameter() {
        let mut out = Some(vec![1, 2, 3]);
        assert_eq!(asprintf(&mut out, b"%llp", &[]), -1);
        assert!(out.is_none());
    }

    #[test]
    fn test_v_variant_does_not_advance_caller_handle() {
        let args = [Arg::Int(5)];
        let list = ArgList::new(&args);
        let mut a = Vec::new();
        let mut b = Vec::new();
        assert_eq!(vfprintf(&mut a, b"%d", &list), 1);
        assert_eq!(vfprintf(&mut b, b"%d", &list), 1);
        assert_eq!(a, b"5");
        assert_eq!(b, b"5");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_dprintf_bad_fd_fails() {
        assert_eq!(dprintf(-1, b"x", &[]), -1);
    }
}
