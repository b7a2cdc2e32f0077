//! Fixed-capacity byte buffer shared by both directions of the connection
//!
//! `storage[..used]` holds bytes that were received (or queued for sending)
//! but not consumed yet. One byte of storage is always kept free, so a full
//! buffer has `used == CAPACITY - 1`.

use std::io::{self, Read, Write};

use crate::MAX_FRAME_LENGTH;

/// Storage size of every framed buffer
pub const BUFFER_CAPACITY: usize = MAX_FRAME_LENGTH + 1;

/// Byte buffer with a "bytes used" cursor
pub struct FramedBuffer {
    storage: [u8; BUFFER_CAPACITY],
    used: usize,
}

impl FramedBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            storage: [0; BUFFER_CAPACITY],
            used: 0,
        }
    }

    /// Number of buffered bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Whether no more bytes can be appended
    #[inline]
    pub fn is_full(&self) -> bool {
        self.used == BUFFER_CAPACITY - 1
    }

    /// Bytes that can still be appended
    #[inline]
    pub fn remaining(&self) -> usize {
        BUFFER_CAPACITY - self.used - 1
    }

    /// Buffered bytes
    #[inline]
    pub fn filled(&self) -> &[u8] {
        &self.storage[..self.used]
    }

    /// Copy as much of `bytes` as fits, returning how many were taken
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.remaining());
        self.storage[self.used..self.used + n].copy_from_slice(&bytes[..n]);
        self.used += n;
        n
    }

    /// Read once from `source` into the free space
    ///
    /// `Ok(0)` means the source reached end of stream (or the buffer was
    /// already full); for a socket this is a closed connection.
    pub fn fill_from<R: Read + ?Sized>(&mut self, source: &mut R) -> io::Result<usize> {
        let end = BUFFER_CAPACITY - 1;
        let n = source.read(&mut self.storage[self.used..end])?;
        self.used += n;
        Ok(n)
    }

    /// Write the buffered bytes to `sink` once and drop what was written
    ///
    /// A short write leaves the rest queued at the front of the buffer.
    pub fn drain_into<W: Write + ?Sized>(&mut self, sink: &mut W) -> io::Result<usize> {
        if self.used == 0 {
            return Ok(0);
        }
        let n = sink.write(self.filled())?;
        self.consume_prefix(n);
        Ok(n)
    }

    /// Drop the first `n` bytes, shifting the tail to the front
    pub fn consume_prefix(&mut self, n: usize) {
        let n = n.min(self.used);
        self.storage.copy_within(n..self.used, 0);
        self.used -= n;
    }
}

impl Default for FramedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FramedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramedBuffer")
            .field("used", &self.used)
            .field("data", &String::from_utf8_lossy(self.filled()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writer accepting at most `limit` bytes per call, then blocking
    struct Choked {
        written: Vec<u8>,
        limit: usize,
        calls_left: usize,
    }

    impl Write for Choked {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.calls_left == 0 {
                return Err(io::ErrorKind::WouldBlock.into());
            }
            self.calls_left -= 1;
            let n = buf.len().min(self.limit);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_append_respects_reserved_byte() {
        let mut buf = FramedBuffer::new();
        let data = vec![b'x'; BUFFER_CAPACITY + 10];
        assert_eq!(buf.append(&data), BUFFER_CAPACITY - 1);
        assert!(buf.is_full());
        assert_eq!(buf.remaining(), 0);
        assert_eq!(buf.append(b"more"), 0);
    }

    #[test]
    fn test_consume_prefix_shifts_tail() {
        let mut buf = FramedBuffer::new();
        buf.append(b"hello\r\nwor");
        buf.consume_prefix(7);
        assert_eq!(buf.filled(), b"wor");
        buf.append(b"ld");
        assert_eq!(buf.filled(), b"world");
    }

    #[test]
    fn test_consume_more_than_used() {
        let mut buf = FramedBuffer::new();
        buf.append(b"abc");
        buf.consume_prefix(10);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_fill_from_reports_eof() {
        let mut buf = FramedBuffer::new();
        let mut source: &[u8] = b"2\r\n";
        assert_eq!(buf.fill_from(&mut source).unwrap(), 3);
        assert_eq!(buf.fill_from(&mut source).unwrap(), 0);
        assert_eq!(buf.filled(), b"2\r\n");
    }

    #[test]
    fn test_fill_from_never_overflows() {
        let mut buf = FramedBuffer::new();
        let data = vec![b'y'; 1000];
        let mut source: &[u8] = &data;
        let n = buf.fill_from(&mut source).unwrap();
        assert_eq!(n, BUFFER_CAPACITY - 1);
        assert_eq!(source.len(), 1000 - n);
    }

    #[test]
    fn test_drain_partial_write_keeps_remainder() {
        let mut buf = FramedBuffer::new();
        buf.append(b"send hello\r\n");
        let mut sink = Choked {
            written: Vec::new(),
            limit: 4,
            calls_left: 1,
        };

        assert_eq!(buf.drain_into(&mut sink).unwrap(), 4);
        assert_eq!(buf.filled(), b" hello\r\n");

        let err = buf.drain_into(&mut sink).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
        assert_eq!(buf.filled(), b" hello\r\n");

        sink.calls_left = 1;
        sink.limit = 64;
        buf.drain_into(&mut sink).unwrap();
        assert!(buf.is_empty());
        assert_eq!(sink.written, b"send hello\r\n");
    }
}
