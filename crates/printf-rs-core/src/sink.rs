//! Output sinks.
//!
//! One character at a time, to one of four destinations: a byte stream, a
//! raw file descriptor, a caller-supplied buffer with a character limit, or
//! a self-growing allocated buffer whose ownership ends up with the caller.
//!
//! Every sink counts the characters that *would* have been written:
//! `characters_written` advances even when the caller-buffer sink
//! suppresses a store past its limit. That count is what the printf entry
//! points return.

use std::io::{self, Write};

use crate::diag::PrintfError;

/// Initial capacity of the allocated-buffer sink.
const BASE_ALLOCATED_CAPACITY: usize = 16;

/// Where emitted characters go.
enum SinkTarget<'a> {
    /// A byte stream; errors propagate from the writer.
    Stream(&'a mut dyn Write),
    /// A raw file descriptor written one byte per `write(2)`. A short
    /// write or syscall error fails the call; `EINTR` is not retried.
    Fd(i32),
    /// A caller buffer. `pos` is the next store offset; stores that would
    /// reach `character_limit - 1` are suppressed, reserving the final
    /// slot for the terminator.
    Buffer { buf: &'a mut [u8], pos: usize },
    /// A growing buffer; capacity doubles when full.
    Allocated(Vec<u8>),
}

/// A destination for formatted output plus its write accounting.
pub struct OutputSink<'a> {
    target: SinkTarget<'a>,
    characters_written: usize,
    character_limit: usize,
}

impl<'a> OutputSink<'a> {
    /// Sink over a byte stream. No character limit.
    pub fn stream(writer: &'a mut dyn Write) -> Self {
        Self {
            target: SinkTarget::Stream(writer),
            characters_written: 0,
            character_limit: usize::MAX,
        }
    }

    /// Sink over a raw file descriptor. No character limit.
    pub fn fd(fd: i32) -> Self {
        Self {
            target: SinkTarget::Fd(fd),
            characters_written: 0,
            character_limit: usize::MAX,
        }
    }

    /// Sink over a caller buffer holding at most `limit` characters
    /// including the terminator. `limit` is clamped to the buffer length.
    pub fn buffer(buf: &'a mut [u8], limit: usize) -> Self {
        let limit = limit.min(buf.len());
        Self {
            target: SinkTarget::Buffer { buf, pos: 0 },
            characters_written: 0,
            character_limit: limit,
        }
    }

    /// Sink over a freshly allocated, growing buffer.
    #[must_use]
    pub fn allocated() -> Self {
        Self {
            target: SinkTarget::Allocated(Vec::with_capacity(BASE_ALLOCATED_CAPACITY)),
            characters_written: 0,
            character_limit: usize::MAX,
        }
    }

    /// Characters emitted so far, counting suppressed caller-buffer stores.
    #[must_use]
    pub fn characters_written(&self) -> usize {
        self.characters_written
    }

    /// Emit one character.
    pub fn emit(&mut self, byte: u8) -> Result<(), PrintfError> {
        match &mut self.target {
            SinkTarget::Stream(writer) => {
                writer.write_all(&[byte])?;
            }
            SinkTarget::Fd(fd) => match crate::sys::sys_write(*fd, &[byte]) {
                Ok(1) => {}
                Ok(_) => {
                    return Err(PrintfError::Io(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "short write to file descriptor",
                    )));
                }
                Err(errno) => {
                    return Err(PrintfError::Io(io::Error::from_raw_os_error(errno)));
                }
            },
            SinkTarget::Buffer { buf, pos } => {
                // Count but store nothing once the terminator slot is all
                // that remains. A zero limit never stores.
                if self.character_limit != 0 && *pos < self.character_limit - 1 {
                    buf[*pos] = byte;
                    *pos += 1;
                }
            }
            SinkTarget::Allocated(buf) => {
                if buf.len() == buf.capacity() {
                    let grow_by = buf.capacity().max(1);
                    buf.try_reserve_exact(grow_by)
                        .map_err(|_| PrintfError::Alloc)?;
                }
                buf.push(byte);
            }
        }
        self.characters_written += 1;
        Ok(())
    }

    /// NUL-terminate a caller buffer at the current store offset.
    ///
    /// No effect on other sink kinds or when the limit is zero.
    pub fn terminate_buffer(&mut self) {
        if let SinkTarget::Buffer { buf, pos } = &mut self.target {
            if self.character_limit != 0 {
                buf[*pos] = 0;
            }
        }
    }

    /// Finish the allocated sink: NUL-terminate and hand the buffer over.
    ///
    /// The returned vector holds `characters_written + 1` bytes, the last
    /// of which is the terminator. Returns `None` for other sink kinds.
    pub fn into_allocated(self) -> Result<Option<Vec<u8>>, PrintfError> {
        match self.target {
            SinkTarget::Allocated(mut buf) => {
                if buf.len() == buf.capacity() {
                    buf.try_reserve_exact(1).map_err(|_| PrintfError::Alloc)?;
                }
                buf.push(0);
                Ok(Some(buf))
            }
            _ => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_all(sink: &mut OutputSink<'_>, bytes: &[u8]) {
        for &b in bytes {
            sink.emit(b).expect("emit");
        }
    }

    #[test]
    fn test_stream_sink_counts_and_forwards() {
        let mut out = Vec::new();
        {
            let mut sink = OutputSink::stream(&mut out);
            emit_all(&mut sink, b"abc");
            assert_eq!(sink.characters_written(), 3);
        }
        assert_eq!(out, b"abc");
    }

    #[test]
    fn test_buffer_sink_reserves_terminator_slot() {
        let mut buf = [0xAAu8; 4];
        let mut sink = OutputSink::buffer(&mut buf, 4);
        emit_all(&mut sink, b"12345");
        assert_eq!(sink.characters_written(), 5);
        sink.terminate_buffer();
        assert_eq!(&buf, b"123\0");
    }

    #[test]
    fn test_buffer_sink_zero_limit_counts_only() {
        let mut buf = [0xAAu8; 2];
        let mut sink = OutputSink::buffer(&mut buf, 0);
        emit_all(&mut sink, b"xy");
        assert_eq!(sink.characters_written(), 2);
        sink.terminate_buffer();
        assert_eq!(buf, [0xAA, 0xAA]);
    }

    #[test]
    fn test_buffer_sink_limit_clamped_to_slice() {
        let mut buf = [0u8; 3];
        let mut sink = OutputSink::buffer(&mut buf, 100);
        emit_all(&mut sink, b"hello");
        assert_eq!(sink.characters_written(), 5);
        sink.terminate_buffer();
        assert_eq!(&buf, b"he\0");
    }

    #[test]
    fn test_buffer_sink_exact_fit_terminates_after_content() {
        let mut buf = [0xAAu8; 6];
        let mut sink = OutputSink::buffer(&mut buf, 6);
        emit_all(&mut sink, b"ab");
        sink.terminate_buffer();
        assert_eq!(&buf[..3], b"ab\0");
    }

    #[test]
    fn test_allocated_sink_grows_and_terminates() {
        let mut sink = OutputSink::allocated();
        let payload: Vec<u8> = (0..100).map(|i| b'a' + (i % 26) as u8).collect();
        emit_all(&mut sink, &payload);
        assert_eq!(sink.characters_written(), 100);
        let buf = sink.into_allocated().expect("alloc").expect("allocated");
        assert_eq!(buf.len(), 101);
        assert_eq!(buf[100], 0);
        assert_eq!(&buf[..100], &payload[..]);
    }

    #[test]
    fn test_count_is_monotonic_across_sink_kinds() {
        let mut buf = [0u8; 2];
        let mut sink = OutputSink::buffer(&mut buf, 2);
        let mut last = 0;
        for _ in 0..10 {
            sink.emit(b'z').expect("emit");
            assert!(sink.characters_written() > last);
            last = sink.characters_written();
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_fd_sink_write_failure_propagates() {
        let mut sink = OutputSink::fd(-1);
        assert!(matches!(sink.emit(b'x'), Err(PrintfError::Io(_))));
        assert_eq!(sink.characters_written(), 0);
    }
}
