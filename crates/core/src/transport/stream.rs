//! Blocking-style `Read`/`Write` over a non-blocking tokio socket

use std::io::{self, Read, Write};

use tokio::net::TcpStream;

/// Adapter performing one `try_read`/`try_write` per call
///
/// Calls never wait: when the socket is not ready the error kind is
/// `WouldBlock`, which the session treats as backpressure.
pub struct StreamIo<'a>(pub &'a TcpStream);

impl Read for StreamIo<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.try_read(buf)
    }
}

impl Write for StreamIo<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.try_write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
